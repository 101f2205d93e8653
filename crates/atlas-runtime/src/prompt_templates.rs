#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Closed set of taxonomy sections with a generation template.
///
/// Keeping this an enum rather than a string-keyed lookup makes the set of
/// supported sections statically checkable; a section absent here has no
/// template and the selection fails with an apology.
pub enum SectionPrompt {
    Osteologie,
    Arthrologie,
    Myologie,
    Vascularisation,
    Lymphatiques,
    Innervation,
}

impl SectionPrompt {
    /// Maps a top-level section label to its template, if one exists.
    pub fn from_section(label: &str) -> Option<Self> {
        match label {
            "Osteologie" => Some(Self::Osteologie),
            "Arthrologie" => Some(Self::Arthrologie),
            "Myologie" => Some(Self::Myologie),
            "Vascularisation" => Some(Self::Vascularisation),
            "Lymphatiques" => Some(Self::Lymphatiques),
            "Innervation" => Some(Self::Innervation),
            _ => None,
        }
    }

    /// Builds the section-specific natural-language query for `item_name`.
    pub fn render(&self, item_name: &str) -> String {
        match self {
            Self::Osteologie => format!(
                "Donner une Definition, une Description, une Orientation, une Situation, et des Repères palpables de : {item_name}."
            ),
            Self::Arthrologie => format!(
                "Donner Type d'articulation, Surfaces articulaires, Moyens d'union, Muscles moteurs, Mouvement de l'articulation : {item_name}."
            ),
            Self::Myologie => format!(
                "Décrire l'origine, trajet, terminaison, action et l'innervation du muscle : {item_name}."
            ),
            Self::Vascularisation => format!(
                "Donner la vascularisation, l'origine et les branches principales de : {item_name}."
            ),
            Self::Lymphatiques => format!(
                "Décrire la distribution et les structures cibles du système lymphatique de : {item_name}."
            ),
            Self::Innervation => format!(
                "Donner les nerfs principaux, les branches et les cibles d'innervation de : {item_name}."
            ),
        }
    }
}
