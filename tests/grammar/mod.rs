//! Grammar compilation tests against the shipped Firestore rules grammar.

pub mod tests_access_modifiers;
pub mod tests_single_flight;
pub mod tests_symbol_table;
