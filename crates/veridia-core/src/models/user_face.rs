use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

/// Face record pose category
///
/// Enrollment stores `left`/`right`/`straight` as a replaceable unit; `login`
/// records are append-only history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FacePose {
    Left,
    Right,
    Straight,
    Login,
}

impl FacePose {
    pub fn as_str(&self) -> &'static str {
        match self {
            FacePose::Left => "left",
            FacePose::Right => "right",
            FacePose::Straight => "straight",
            FacePose::Login => "login",
        }
    }

    /// Label embedded in storage object keys for this pose.
    pub fn key_label(&self) -> &'static str {
        match self {
            FacePose::Left => "left_face",
            FacePose::Right => "right_face",
            FacePose::Straight => "front_face",
            FacePose::Login => "login_face",
        }
    }
}

impl Display for FacePose {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}
