use serde::{Deserialize, Serialize};

/// Header markup placed at the top of every application document.
pub const DEFAULT_HEADER_HTML: &str = r#"<header class="document-header"><h1>Application Summary</h1><p>Confidential</p></header>"#;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageNumbers {
    #[default]
    None,
    Numeric,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderRepeat {
    #[default]
    AllPages,
    FirstPageOnly,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderOptions {
    pub repeat: HeaderRepeat,
    pub html: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfOptions {
    pub page_numbers: PageNumbers,
    pub header: HeaderOptions,
}

impl PdfOptions {
    /// Fixed layout used for application documents: numbered pages and
    /// [`DEFAULT_HEADER_HTML`] on the first page only.
    pub fn application_document() -> Self {
        Self {
            page_numbers: PageNumbers::Numeric,
            header: HeaderOptions {
                repeat: HeaderRepeat::FirstPageOnly,
                html: DEFAULT_HEADER_HTML.to_string(),
            },
        }
    }
}
