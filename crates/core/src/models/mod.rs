//! Patient record data model as exchanged with the records service.

pub mod ailments;
pub mod patient;

pub use ailments::{ActiveAilment, Ailment, AilmentTone, OtherAilments};
pub use patient::{recent_patients, sex_label, NewVisit, Patient, Visit};
