//! Japanese strings shown to the user.

pub const IMAGE_PROCESSING_ERROR_MESSAGE: &str = "画像の処理に失敗しました";
pub const IMPORT_FAILED_MESSAGE: &str = "インポートに失敗しました";
pub const STORE_ERROR_MESSAGE: &str = "データの保存または読み込みに失敗しました";
pub const EXPORT_FAILED_MESSAGE: &str = "エクスポートに失敗しました";
pub const FILE_ACCESS_ERROR_MESSAGE: &str = "ファイルの読み書きに失敗しました";
pub const CARD_NOT_FOUND_MESSAGE: &str = "カードが見つかりません";
pub const IMAGE_NOT_FOUND_MESSAGE: &str = "画像が見つかりません";

pub const IMPORT_SUCCESS_MESSAGE: &str = "プロジェクトをインポートしました";
pub const IMPORT_CONFIRM_TITLE: &str = "プロジェクトを開く";
pub const IMPORT_CONFIRM_DESCRIPTION: &str = "現在のプロジェクトは上書きされます。続行しますか？";

pub const TEMPLATE_APPLY_SUCCESS: &str = "テンプレートを適用しました";

pub const PROJECT_DELETE_CONFIRM_TITLE: &str = "プロジェクトを削除";
pub const PROJECT_DELETE_CONFIRM_DESCRIPTION: &str = "現在表示されているプロジェクトを削除します。この操作は元に戻せません。保存する場合は事前にバックアップをダウンロードしてください。";
pub const PROJECT_DELETE_SUCCESS_MESSAGE: &str = "プロジェクトを削除しました";

pub const IMAGE_SAVED_MESSAGE: &str = "画像を保存しました";
pub const DELETE_SUCCESS_MESSAGE: &str = "カードを削除しました";

pub const BUTTON_CANCEL: &str = "キャンセル";

pub fn max_item_count_reached(max: usize) -> String {
    format!("カードは最大{max}枚までです")
}

pub fn image_delete_success(count: usize) -> String {
    format!("{count}件の画像を削除しました")
}
