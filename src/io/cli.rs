//! Command-line interface for batch reconstruction of chain files

use crate::algorithm::executor::{ReconstructionConfig, Reconstructor};
use crate::io::configuration::{
    DEFAULT_MAX_BRANCHES, DEFAULT_MAX_PASSES, EMPTY_CELL, MAX_CHAIN_LENGTH, MAX_ENUMERATED_LENGTH,
    OUTPUT_SUFFIX, TEXT_EXTENSION,
};
use crate::io::error::{Result, file_system_error, invalid_parameter};
use crate::io::lattice::{InputFormat, read_blocks, write_grids};
use crate::io::progress::ProgressManager;
use crate::spatial::walk::{enumerate_walks, random_walk};
use clap::{ArgAction, Parser};
use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use tracing::{Level, debug};

#[derive(Parser)]
#[command(name = "latticefold")]
#[command(
    author,
    version,
    about = "Reconstruct square-lattice embeddings of folded chains from their contacts"
)]
/// Command-line arguments for the reconstruction tool
pub struct Cli {
    /// Input text file or directory to process, or the output file with --generate
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// How the blocks of each input file are read
    #[arg(short, long, value_enum, default_value_t = InputFormat::Lattice)]
    pub format: InputFormat,

    /// Commit pairwise moves outright instead of branching
    #[arg(short, long)]
    pub greedy: bool,

    /// Alternatives the search may try per chain
    #[arg(short = 'b', long, default_value_t = DEFAULT_MAX_BRANCHES)]
    pub max_branches: usize,

    /// Control-loop passes allowed per chain
    #[arg(short = 'p', long, default_value_t = DEFAULT_MAX_PASSES)]
    pub max_passes: usize,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,

    /// Write self-avoiding walks of N vertices to TARGET instead of reconstructing
    #[arg(short = 'G', long, value_name = "N")]
    pub generate: Option<usize>,

    /// Seed for a single random walk with --generate; all walks when absent
    #[arg(short, long, requires = "generate")]
    pub seed: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Search budgets selected by the flags
    pub const fn config(&self) -> ReconstructionConfig {
        ReconstructionConfig {
            max_branches: if self.greedy { 0 } else { self.max_branches },
            max_passes: self.max_passes,
        }
    }

    /// Most detailed log level to emit
    pub const fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

/// Orchestrates batch processing of chain files with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// A chain that fails to reconstruct is reported and left out of the
    /// output; it does not stop the batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the budgets are invalid, the target is unusable,
    /// or a file cannot be read, parsed or written
    pub fn process(&mut self) -> Result<()> {
        if let Some(length) = self.cli.generate {
            return self.generate(length);
        }

        let mut reconstructor = Reconstructor::new(self.cli.config())?;
        let files = self.collect_files()?;

        if files.is_empty() {
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for (index, file) in files.iter().enumerate() {
            self.process_file(&mut reconstructor, file, index)?;
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let target = &self.cli.target;
        if target.is_file() {
            if !is_text_file(target) {
                return Err(invalid_parameter(
                    "target",
                    &target.display(),
                    &format!("target file must have the .{TEXT_EXTENSION} extension"),
                ));
            }
            Ok(if self.should_process_file(target) {
                vec![target.clone()]
            } else {
                vec![]
            })
        } else if target.is_dir() {
            let mut files = Vec::new();
            let entries = std::fs::read_dir(target).map_err(file_system_error(target, "list"))?;
            for entry in entries {
                let path = entry.map_err(file_system_error(target, "list"))?.path();
                if is_text_file(&path) && !is_output_file(&path) && self.should_process_file(&path)
                {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(invalid_parameter(
                "target",
                &target.display(),
                &"target must be a text file or directory",
            ))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = Self::get_output_path(input_path);
        if output_path.exists() {
            // Allow print for user feedback for progress messages
            #[allow(clippy::print_stderr)]
            if !self.cli.quiet {
                eprintln!("Skipping: {} (output exists)", input_path.display());
            }
            false
        } else {
            true
        }
    }

    fn process_file(
        &mut self,
        reconstructor: &mut Reconstructor,
        input_path: &Path,
        index: usize,
    ) -> Result<()> {
        let blocks = read_blocks(input_path)?;
        if let Some(ref mut pm) = self.progress_manager {
            pm.start_file(index, input_path, blocks.len());
        }

        // A failed chain keeps its slot as a lone empty cell
        let mut grids = Vec::with_capacity(blocks.len());
        for (chain, block) in blocks.iter().enumerate() {
            let outcome = block
                .to_model(self.cli.format)
                .and_then(|model| reconstructor.reconstruct(&model));

            let succeeded = match outcome {
                Ok(reconstruction) => {
                    debug!(
                        file = %input_path.display(),
                        chain = chain + 1,
                        stats = ?reconstruction.stats,
                        "chain reconstructed"
                    );
                    grids.push(reconstruction.grid);
                    true
                }
                Err(error) => {
                    self.report(&format!(
                        "{}: chain {} (line {}): {error}",
                        input_path.display(),
                        chain + 1,
                        block.line
                    ));
                    grids.push(Array2::from_elem((1, 1), EMPTY_CELL));
                    false
                }
            };

            if let Some(ref mut pm) = self.progress_manager {
                pm.record_chain(index, succeeded);
            }
        }

        write_grids(&Self::get_output_path(input_path), &grids)?;

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index);
        }

        Ok(())
    }

    fn generate(&self, length: usize) -> Result<()> {
        if length == 0 {
            return Err(invalid_parameter(
                "generate",
                &length,
                &"walks need at least one vertex",
            ));
        }

        let limit = if self.cli.seed.is_some() {
            MAX_CHAIN_LENGTH
        } else {
            MAX_ENUMERATED_LENGTH
        };
        if length > limit {
            return Err(invalid_parameter(
                "generate",
                &length,
                &format!("at most {limit} vertices are supported in this mode"),
            ));
        }

        let walks = match self.cli.seed {
            Some(seed) => vec![random_walk(length, &mut StdRng::seed_from_u64(seed))?],
            None => enumerate_walks(length),
        };
        write_grids(&self.cli.target, &walks)?;

        if !self.cli.quiet {
            self.report(&format!(
                "Wrote {} walks of length {length} to {}",
                walks.len(),
                self.cli.target.display()
            ));
        }
        Ok(())
    }

    // Allow print for per-chain failures and summaries when no bars are shown
    #[allow(clippy::print_stderr)]
    fn report(&self, message: &str) {
        match self.progress_manager {
            Some(ref pm) => pm.report(message),
            None => eprintln!("{message}"),
        }
    }

    /// Output path for an input file: `<stem>_result.txt` beside it
    pub fn get_output_path(input_path: &Path) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let output_name = format!(
            "{}{}.{}",
            stem.to_string_lossy(),
            OUTPUT_SUFFIX,
            TEXT_EXTENSION
        );

        if let Some(parent) = input_path.parent() {
            parent.join(output_name)
        } else {
            PathBuf::from(output_name)
        }
    }
}

fn is_text_file(path: &Path) -> bool {
    path.is_file() && path.extension().and_then(|s| s.to_str()) == Some(TEXT_EXTENSION)
}

fn is_output_file(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.ends_with(OUTPUT_SUFFIX))
}
