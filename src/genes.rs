use crate::error::QcError;
use crate::util::file::read_name_list;

use anyhow::{self, Context};
use clap::Args;
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct FilterArgs {
    /// variant table (tab-separated, with a header row)
    #[arg(short, long)]
    variants: PathBuf,

    /// gene list (one gene per line)
    #[arg(short, long)]
    genes: PathBuf,

    /// gene column of the variant table (default: gene)
    #[arg(long)]
    gene_column: Option<Box<str>>,

    /// output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
pub struct SourceArgs {
    /// gene list files, each followed by its source label:
    /// FILE SOURCE [FILE SOURCE ...]
    #[arg(required = true, num_args = 1..)]
    pairs: Vec<Box<str>>,

    /// output CSV file
    #[arg(short, long)]
    output: PathBuf,
}

/// Keep the rows of a tab-separated table whose `gene_column` value
/// is one of `genes`. Returns the number of rows kept.
pub fn filter_variants<W: Write>(
    variants: &Path,
    genes: &HashSet<Box<str>>,
    gene_column: &str,
    out: W,
) -> anyhow::Result<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_path(variants)
        .with_context(|| format!("failed to open {}", variants.display()))?;

    let header = reader.headers()?.clone();
    let col = header.iter().position(|x| x == gene_column).ok_or_else(|| {
        QcError::GeneList(format!(
            "no `{}` column in {}",
            gene_column,
            variants.display()
        ))
    })?;

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_writer(out);
    writer.write_record(&header)?;

    let mut nkept = 0;
    for rec in reader.records() {
        let rec = rec?;
        if rec.get(col).map_or(false, |g| genes.contains(g)) {
            writer.write_record(&rec)?;
            nkept += 1;
        }
    }
    writer.flush()?;
    Ok(nkept)
}

/// Pair each gene of each list with the list's source label and write
/// them as `gene,source` rows
pub fn write_gene_sources<W: Write>(
    lists: &[(PathBuf, Box<str>)],
    out: W,
) -> anyhow::Result<usize> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["gene", "source"])?;

    let mut nrows = 0;
    for (file, source) in lists {
        let genes = read_name_list(file)
            .with_context(|| format!("failed to read gene list {}", file.display()))?;
        for g in genes.iter() {
            writer.write_record([&g[..], &source[..]])?;
            nrows += 1;
        }
    }
    writer.flush()?;
    Ok(nrows)
}

/// Split `FILE SOURCE FILE SOURCE ...` into pairs
pub fn pair_up(args: &[Box<str>]) -> Result<Vec<(PathBuf, Box<str>)>, QcError> {
    if args.is_empty() || args.len() % 2 != 0 {
        return Err(QcError::GeneList(
            "expected FILE SOURCE [FILE SOURCE ...]".to_string(),
        ));
    }
    Ok(args
        .chunks(2)
        .map(|x| (PathBuf::from(&*x[0]), x[1].clone()))
        .collect())
}

pub fn run_filter(args: &FilterArgs) -> anyhow::Result<()> {
    let genes: HashSet<Box<str>> = read_name_list(&args.genes)
        .with_context(|| format!("failed to read gene list {}", args.genes.display()))?
        .into_iter()
        .collect();

    log::info!("{} genes in {}", genes.len(), args.genes.display());

    let gene_column = args.gene_column.as_deref().unwrap_or("gene");

    let nkept = match &args.output {
        Some(path) => {
            let file = std::fs::File::create(path).map_err(|e| QcError::sink(path, e))?;
            filter_variants(&args.variants, &genes, gene_column, file)?
        }
        None => {
            let stdout = std::io::stdout().lock();
            filter_variants(&args.variants, &genes, gene_column, stdout)?
        }
    };

    log::info!("kept {} variant rows", nkept);
    Ok(())
}

pub fn run_sources(args: &SourceArgs) -> anyhow::Result<()> {
    let lists = pair_up(&args.pairs)?;

    if let Some(dir) = args.output.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir).map_err(|e| QcError::sink(dir, e))?;
        }
    }

    let file =
        std::fs::File::create(&args.output).map_err(|e| QcError::sink(&args.output, e))?;
    let nrows = write_gene_sources(&lists, file)?;

    log::info!("wrote {} genes to {}", nrows, args.output.display());
    Ok(())
}
