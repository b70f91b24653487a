pub use error::EngineError;
pub use ops::{Engine, EngineBuilder};
pub use remap::{EntityKind, RemapTable};
pub use validate::validate_backup;

pub mod alerts;
pub mod anagrafiche;
pub mod categorie_anagrafiche;
pub mod categorie_movimenti;
pub mod conti;
pub mod movimenti;
pub mod tipologie;
pub mod users;

mod error;
mod ops;
mod remap;
mod validate;

pub(crate) type ResultEngine<T> = Result<T, EngineError>;
