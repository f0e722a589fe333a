use codon_table::CodonTable;
use lazy_static::lazy_static;

pub mod about;
pub mod alignment;
pub mod cas9_site;
pub mod codon_table;
pub mod efficiency;
pub mod error;
pub mod gene;
pub mod nucleotide;
pub mod parameters;
pub mod repair_template;
pub mod silent_mutation;

lazy_static! {
    // Standard genetic code and its synonym index
    pub static ref CODON_TABLE: CodonTable = CodonTable::default();
}
