pub mod export;
pub mod rules;
pub mod statement;

pub use export::write_categorized_csv;
pub use rules::{CategoryRules, Classifier, RuleError, RuleStore, RuleTable, SharedRules, INCOME, OTHER};
pub use statement::{import_statement, read_statement, DropReason, DroppedRow, ImportError, Statement};
