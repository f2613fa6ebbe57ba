//! Database repositories.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Family-owned rows are
//! always looked up by `(family_id, id)` so a caller can never reach
//! another tenant's data.

pub mod account_repo;
pub mod baby_repo;
pub mod bath_log_repo;
pub mod caretaker_repo;
pub mod diaper_log_repo;
pub mod family_repo;
pub mod feed_log_repo;
pub mod measurement_repo;
pub mod medicine_repo;
pub mod milestone_repo;
pub mod note_repo;
pub mod settings_repo;
pub mod setup_repo;
pub mod setup_token_repo;
pub mod sleep_log_repo;
pub mod timeline_repo;
pub mod unit_repo;

pub use account_repo::AccountRepo;
pub use baby_repo::BabyRepo;
pub use bath_log_repo::BathLogRepo;
pub use caretaker_repo::CaretakerRepo;
pub use diaper_log_repo::DiaperLogRepo;
pub use family_repo::FamilyRepo;
pub use feed_log_repo::FeedLogRepo;
pub use measurement_repo::MeasurementRepo;
pub use medicine_repo::{MedicineLogRepo, MedicineRepo};
pub use milestone_repo::MilestoneRepo;
pub use note_repo::NoteRepo;
pub use settings_repo::SettingsRepo;
pub use setup_repo::SetupRepo;
pub use setup_token_repo::SetupTokenRepo;
pub use sleep_log_repo::SleepLogRepo;
pub use timeline_repo::TimelineRepo;
pub use unit_repo::UnitRepo;
