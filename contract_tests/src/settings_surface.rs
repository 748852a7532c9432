//! Settings snapshot contract tests
//!
//! The persisted JSON shape is shared with the out-of-scope UI; its
//! field names and enum spellings must stay stable.
