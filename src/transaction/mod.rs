//! Transaction assembly

pub mod builder;
pub mod instruction;
pub mod request;
pub mod template;

pub use builder::{Transaction, TransactionBuilder};
pub use instruction::{Arg, Instruction, WorkspaceKey};
pub use request::{build_transaction_request, SubmitTransactionRequest, SubstateRequirement};
pub use template::{AccountTemplate, TariswapTemplate, TemplateFunction, TemplateMethod};
