use serde::Serialize;

/// A bundled template as listed to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMetadata {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub card_count: usize,
    /// Directory of the template's assets, relative to the template base.
    pub path: &'static str,
}

const fn template(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    card_count: usize,
) -> TemplateMetadata {
    TemplateMetadata {
        id,
        name,
        description,
        card_count,
        path: id,
    }
}

pub const TEMPLATES: &[TemplateMetadata] = &[
    template("in-bed-for-stroke", "【脳卒中】ベッド上の自主トレ", "脳卒中後の患者さん向け", 6),
    template("seated-in-a-chair-for-stroke", "【脳卒中】座位の自主トレ", "脳卒中後の患者さん向け", 5),
    template("upper-extremity-for-stroke", "【脳卒中】上肢の自主トレ", "脳卒中後の患者さん向け", 6),
    template("swallowing", "嚥下体操", "嚥下機能向上のための間接的自主トレ", 5),
    template("full-body-workout", "全身の自主トレ", "全身をバランスよく鍛えるための自主トレ", 6),
    template(
        "after-lower-limb-orthopedic-surgery",
        "下肢の整形外科術後の自主トレ",
        "術後急性期からベッド上でできる自主トレ",
        8,
    ),
    template("low-back-pain", "腰痛体操", "主に腰椎屈曲傾向の患者さん向けの自主トレ", 6),
    template("shoulder-stiffness", "肩こり体操", "肩こりの改善と予防のための自主トレ", 6),
];

pub fn find_template(id: &str) -> Option<&'static TemplateMetadata> {
    TEMPLATES.iter().find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = TEMPLATES.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), TEMPLATES.len());
        assert_eq!(TEMPLATES.len(), 8);
    }

    #[test]
    fn lookup() {
        assert_eq!(find_template("swallowing").map(|t| t.card_count), Some(5));
        assert!(find_template("unknown").is_none());
    }
}
