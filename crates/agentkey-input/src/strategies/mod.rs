pub mod clipboard_image;
pub mod clipboard_text;
pub mod editor_file;
pub mod file_upload;
pub mod screenshot;
pub mod selected_text;

pub use clipboard_image::ClipboardImageStrategy;
pub use clipboard_text::TextSelectionStrategy;
pub use editor_file::EditorActiveFileStrategy;
pub use file_upload::FileUploadStrategy;
pub use screenshot::ScreenshotStrategy;
pub use selected_text::SelectedTextStrategy;
