/// Sources of formula lists: text files, pasted text, the first column of CSV files
pub mod formula_sources;
