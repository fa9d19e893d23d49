pub mod bucket;
pub mod extract;
pub mod keyselect;
pub mod value;

pub use value::ValueClass;

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Field names retained for the full pass, per module and role, in selection
/// order. Produced once by the key selector and read-only afterwards.
pub type AllowedFieldSet = HashMap<String, HashMap<String, Vec<String>>>;

/// Match results grouped per module into rank buckets `0..K-1`.
pub type BucketMap = HashMap<String, BTreeMap<usize, Vec<MatchResult>>>;

/// One comparable record, flattened out of the nested profile collection.
///
/// `entry_index` is the 1-based position of the entry within its role's
/// sequence at extraction time. Entries are rebuilt on every extraction pass
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
	pub module: String,
	pub role: String,
	pub entry_index: usize,
	pub fields: Vec<EntryField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryField {
	pub name: String,
	pub value: ValueClass,
}

/// Which embedding model scored a match. Mixed-length pairs are never scored,
/// so every result carries exactly one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextClass {
	Short,
	Long,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSide {
	pub module: String,
	pub role: String,
	pub entry_index: usize,
	pub field: String,
	pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
	pub entry1: MatchSide,
	pub entry2: MatchSide,
	pub score: f32,
	pub text_class: TextClass,
}
