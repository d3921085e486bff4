pub mod add;
pub mod r#do;
pub mod ledger;
pub mod templates;
pub mod view;
