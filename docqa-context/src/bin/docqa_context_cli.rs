use clap::Parser;
use docqa_context::{TextSplitter, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};

/// A CLI tool to split text into overlapping chunks as JSON output.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input text file. If not provided, reads from stdin.
    #[arg(short, long)]
    input: Option<String>,

    /// Maximum length for each text chunk.
    #[arg(short = 's', long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Overlap carried from one chunk into the next. Must be less than the
    /// chunk size.
    #[arg(short = 'o', long, default_value_t = DEFAULT_CHUNK_OVERLAP)]
    chunk_overlap: usize,
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    let text = if let Some(input_path) = args.input {
        fs::read_to_string(input_path)?
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    };

    if args.chunk_overlap >= args.chunk_size {
        eprintln!("chunk_overlap must be strictly less than chunk_size");
        std::process::exit(2);
    }

    let splitter = TextSplitter::new(args.chunk_size, args.chunk_overlap);
    let chunks = splitter.split(&text);

    #[derive(Serialize)]
    struct ChunkOutput<'a> {
        index: usize,
        length: usize,
        content: &'a str,
    }

    let output: Vec<ChunkOutput> = chunks
        .iter()
        .enumerate()
        .map(|(index, content)| ChunkOutput {
            index,
            length: content.len(),
            content,
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
