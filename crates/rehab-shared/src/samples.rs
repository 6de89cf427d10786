//! Catalog of the bundled, read-only sample images.
//!
//! Sample images are never stored as binary records. Projects reference them
//! by id and the id resolves to an asset file under the sample base
//! (`SAMPLE_IMAGE_BASE_PATH` unless configured otherwise).

use crate::constants::SAMPLE_IMAGE_ID_PREFIX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleImage {
    pub id: &'static str,
    /// Display name without extension.
    pub file_name: &'static str,
    /// File name under the sample base path.
    pub asset: &'static str,
}

const fn sample(id: &'static str, file_name: &'static str, asset: &'static str) -> SampleImage {
    SampleImage {
        id,
        file_name,
        asset,
    }
}

pub const SAMPLE_IMAGES: &[SampleImage] = &[
    sample("sample_lying_01", "lying_01_ヒップアップ", "lying_01_hip-up.webp"),
    sample("sample_lying_02", "lying_02_足上げ（SLR）", "lying_02_SLR.webp"),
    sample("sample_lying_03", "lying_03_股関節回旋", "lying_03_hip-rotation.webp"),
    sample("sample_lying_04", "lying_04_股関節外転", "lying_04_hip-abduction.webp"),
    sample("sample_lying_05", "lying_05_股関節伸展", "lying_05_hip-extension.webp"),
    sample("sample_lying_06", "lying_06_膝関節屈伸", "lying_06_knee-extension.webp"),
    sample("sample_lying_07", "lying_07_上体起こし", "lying_07_trunk-curl.webp"),
    sample("sample_lying_08", "lying_08_腹部ブレーシング", "lying_08_abdominal-bracing.webp"),
    sample("sample_lying_09", "lying_09_DNS 3 ヶ月肢位", "lying_09_3-month-exercise.webp"),
    sample("sample_lying_10", "lying_10_体幹回旋", "lying_10_trunk-rotation.webp"),
    sample("sample_lying_11", "lying_11_寝返り", "lying_11_roll-over.webp"),
    sample("sample_lying_12", "lying_12_麻痺側上肢リーチング", "lying_12_arm-extension.webp"),
    sample("sample_lying_13", "lying_13_足関節底背屈", "lying_13_ankle-exercise.webp"),
    sample("sample_lying_14", "lying_14_足指じゃんけん", "lying_14_toe-rock-paper-scissors.webp"),
    sample("sample_lying_15", "lying_15_キャットエクササイズ", "lying_15_cat-exercise.webp"),
    sample("sample_lying_16", "lying_16_ライオンエクササイズ", "lying_16_lion-exercise.webp"),
    sample("sample_lying_17", "lying_17_四つ這い肩関節屈曲", "lying_17_quadruped-shoulder-flexion.webp"),
    sample("sample_lying_18", "lying_18_四つ這い股関節伸展1", "lying_18_quadruped-hip-extension1.webp"),
    sample("sample_lying_19", "lying_19_四つ這い股関節伸展2", "lying_19_quadruped-hip-extension2.webp"),
    sample("sample_lying_20", "lying_20_ハンドニー", "lying_20_hand-knee.webp"),
    sample("sample_sitting_01", "sitting_01_股関節屈曲", "sitting_01_hip-fexion.webp"),
    sample("sample_sitting_02", "sitting_02_ハムストレッチ", "sitting_02_ham-stretching.webp"),
    sample("sample_sitting_03", "sitting_03_足関節底背屈", "sitting_03_ankle-exercise.webp"),
    sample("sample_sitting_04", "sitting_04_麻痺側上肢挙上", "sitting_04_arm-raise.webp"),
    sample("sample_sitting_05", "sitting_05_ブリュガー体操", "sitting_05-brugger-exercise.webp"),
    sample("sample_sitting_06", "sitting_06_肩甲骨外旋 1", "sitting_06_scapular-external-rotation1.webp"),
    sample("sample_sitting_07", "sitting_07_肩甲骨外旋 2", "sitting_07_scapular-external-rotation2.webp"),
    sample("sample_sitting_08", "sitting_08_タオル拭き", "sitting_08_towel-wipes.webp"),
    sample("sample_sitting_09", "sitting_09_棒体操", "sitting_09_bar-exercise.webp"),
    sample("sample_sitting_10", "sitting_10_口唇体操", "sitting_10_lip-exercise.webp"),
    sample("sample_sitting_11", "sitting_11_舌体操 1", "sitting_11_tongue-exercise1.webp"),
    sample("sample_sitting_12", "sitting_12_舌体操 2", "sitting_12_tongue-exercise2.webp"),
    sample("sample_standing_01", "standing_01_起立訓練（テーブル）", "standing_01_stand-up-table.webp"),
    sample("sample_standing_02", "standing_02_起立訓練（右手すり）", "standing_02_stand-up-right-side-rail.webp"),
    sample("sample_standing_03", "standing_03_起立訓練（左手すり）", "standing_03_stand-up-left-side-rail.webp"),
    sample("sample_standing_04", "standing_04_起立訓練（椅子）", "standing_04_stand-up-chair.webp"),
    sample("sample_standing_05", "standing_05_スクワット", "standing_05_squat.webp"),
    sample("sample_standing_06", "standing_06_カーフレイズ", "standing_06_calf-raise.webp"),
    sample("sample_standing_07", "standing_07_カーフストレッチ", "standing_07_calf-stretching.webp"),
    sample("sample_standing_08", "standing_08_テーブルデッドリフト", "standing_08_table-dead-lift.webp"),
    sample("sample_standing_09", "standing_09_腕立て伏せ（壁）", "standing_09_wall-push-up.webp"),
    sample("sample_standing_10", "standing_10_壁スライド", "standing_10_wall-slide.webp"),
];

/// Prefix test only; an unknown id with the prefix is still a sample reference.
pub fn is_sample_image(image_id: &str) -> bool {
    image_id.starts_with(SAMPLE_IMAGE_ID_PREFIX)
}

pub fn find_sample(image_id: &str) -> Option<&'static SampleImage> {
    SAMPLE_IMAGES.iter().find(|sample| sample.id == image_id)
}

pub fn is_known_sample(image_id: &str) -> bool {
    find_sample(image_id).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique_and_prefixed() {
        let mut ids: Vec<_> = SAMPLE_IMAGES.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), 42);
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 42);
        assert!(SAMPLE_IMAGES.iter().all(|s| is_sample_image(s.id)));
    }

    #[test]
    fn finds_known_sample() {
        let squat = find_sample("sample_standing_05").unwrap();
        assert_eq!(squat.asset, "standing_05_squat.webp");
        assert_eq!(find_sample("sample_lying_01").unwrap().file_name, "lying_01_ヒップアップ");
    }

    #[test]
    fn unknown_sample_is_prefixed_but_unresolved() {
        assert!(is_sample_image("sample_lying_99"));
        assert!(!is_known_sample("sample_lying_99"));
        assert!(find_sample("sample_lying_99").is_none());
        assert!(!is_sample_image("abc123"));
    }
}
