//! # Value Number Core Library
//!
//! Business logic for the Value Number calculator. The HTTP server and the
//! CLI are thin layers over this crate.
//!
//! ## Architecture
//!
//! - **Engine**: pure S/W formula evaluation and recommendation tiers,
//!   no I/O and no shared state
//! - **Storage**: SQLite persistence for calculation history and request
//!   logs, TOML-based configuration
//! - **Auth**: HS256 bearer tokens carrying the caller identity
//!
//! ## Key Components
//!
//! - [`calculate_s`] / [`calculate_w`]: evaluate and classify one scenario
//! - [`Database`]: calculation history and request log persistence
//! - [`Config`]: application configuration management
//! - [`TokenSigner`]: bearer token issuance and verification

pub mod auth;
pub mod engine;
pub mod error;
pub mod records;
pub mod storage;

pub use auth::{bearer_token, Claims, Role, TokenSigner};
pub use engine::{
    calculate, calculate_s, calculate_w, classify, evaluate_s_formula, evaluate_w_formula,
    normalize_time, CalculationInputs, CalculationResult, FormulaKind, SFormulaInputs, Tier,
    TimeValue, WFormulaInputs,
};
pub use error::{AuthError, ConfigError, CoreError, DatabaseError, EngineError, RecordError};
pub use records::{ConceptAccess, ConceptAccessCreate, StatusCheck, StatusCheckCreate};
pub use storage::{CalculationRecord, Config, Database};
