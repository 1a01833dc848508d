//! Face photo upload orchestration.
//!
//! [`FaceUploader`] handles bounded-concurrency uploads of one pose group;
//! [`EnrollmentService`] and [`VerificationService`] compose groups into the
//! enrollment and login flows.

mod enrollment;
mod uploader;
mod verification;

#[cfg(test)]
mod test_support;

pub use enrollment::EnrollmentService;
pub use uploader::{FaceUploader, PhotoFile};
pub use verification::VerificationService;
