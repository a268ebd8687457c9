pub mod application;
pub mod job;
pub mod student;

pub use application::ApplicationRow;
pub use job::{BranchSelector, EligibilityCriteria, Job, JobStatus};
pub use student::{Academics, Branch, Experience, PersonalInfo, Project, Skills, StudentProfile};

use serde::{Deserialize, Deserializer};

/// Decodes an explicit `null` as the field's default, the same as a missing key.
/// Portal documents carry `null` for blocks the student never filled in.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
