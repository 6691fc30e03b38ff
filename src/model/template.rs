use crate::model::card::{CardState, FrameRect, PhotoSettings, TextLayout};

pub const DEFAULT_REPORTER_FRAME: FrameRect = FrameRect::new(173.0, 238.68, 376.55, 401.39);
pub const DEFAULT_INTERVIEWEE_FRAME: FrameRect = FrameRect::new(572.70, 64.606, 1245.7, 690.34);
pub const DEFAULT_REPORTER_TEXT: TextLayout = TextLayout::new(360.0, 685.0, 320.0, 60.0);
pub const DEFAULT_INTERVIEWEE_TEXT: TextLayout = TextLayout::new(1330.0, 760.0, 1000.0, 60.0);
pub const DEFAULT_REPORTER_TITLE: &str = "記者";

/// The two supported card templates.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    /// Phone interview.
    #[default]
    Interview,
    /// Phone connection.
    Connection,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 2] = [TemplateKind::Interview, TemplateKind::Connection];

    pub fn display_name(self) -> &'static str {
        match self {
            TemplateKind::Interview => "電話訪問",
            TemplateKind::Connection => "電話連線",
        }
    }

    pub fn solid_url(self) -> &'static str {
        match self {
            TemplateKind::Interview => "https://i.meee.com.tw/MewtEHA.png",
            TemplateKind::Connection => "https://i.meee.com.tw/CWleGip.png",
        }
    }

    pub fn transparent_url(self) -> &'static str {
        match self {
            TemplateKind::Interview => "https://i.meee.com.tw/ihfGM4U.png",
            TemplateKind::Connection => "https://i.meee.com.tw/ubzypZk.png",
        }
    }
}

impl std::str::FromStr for TemplateKind {
    type Err = crate::NewscardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interview" => Ok(TemplateKind::Interview),
            "connection" => Ok(TemplateKind::Connection),
            other => Err(crate::NewscardError::validation(format!(
                "unknown template kind '{other}' (expected 'interview' or 'connection')"
            ))),
        }
    }
}

impl CardState {
    /// Fresh session state for a template kind.
    pub fn defaults(kind: TemplateKind) -> Self {
        Self {
            solid_template: kind.solid_url().to_string(),
            transparent_template: kind.transparent_url().to_string(),
            reporter_name: String::new(),
            reporter_title: DEFAULT_REPORTER_TITLE.to_string(),
            reporter_photo: None,
            reporter_settings: PhotoSettings::IDENTITY,
            reporter_frame: DEFAULT_REPORTER_FRAME,
            reporter_text_layout: DEFAULT_REPORTER_TEXT,
            interviewee_name: String::new(),
            interviewee_title: String::new(),
            interviewee_photo: None,
            interviewee_settings: PhotoSettings::IDENTITY,
            interviewee_frame: DEFAULT_INTERVIEWEE_FRAME,
            interviewee_text_layout: DEFAULT_INTERVIEWEE_TEXT,
            photo_credit: String::new(),
            is_transparent_mode: false,
            is_voice_altered: false,
            map_image: None,
        }
    }

    /// Point the card at another template, keeping every user edit.
    pub fn with_template(&self, kind: TemplateKind) -> Self {
        Self {
            solid_template: kind.solid_url().to_string(),
            transparent_template: kind.transparent_url().to_string(),
            ..self.clone()
        }
    }
}

impl Default for CardState {
    fn default() -> Self {
        Self::defaults(TemplateKind::default())
    }
}
