//! Resolve a gene or protein symbol against NCBI Entrez, download the
//! matching NCBI Datasets archive and pull the FASTA files out of it.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod extract;
pub mod ncbi;
pub mod output;
pub mod pipeline;
