/*
 * Copyright [2022] [Kevin Velasco]
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 * http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

mod fixture;

use std::fs::OpenOptions;
use std::io::{BufWriter, Read, Write};
use std::path::PathBuf;

use clap::Parser;

use chunk_assign::{assign_chunks, describe, graph};
use fixture::load_fixture;

#[derive(Parser)]
struct Args {
    /// JSON file describing the module graph: modules, entries,
    /// manual chunk aliases and the minimum chunk size.
    fixture_file: PathBuf,
    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the full assignment pipeline and print the resulting chunks.
    Assign {
        #[clap(short = 'f', long, value_enum, default_value_t = Output::Text)]
        output_format: Output,
        #[clap(short = 'o', long)]
        output_path: Option<PathBuf>,
    },
    /// Show which chunk a given module id ended up in.
    DescribeModule { module_id: String },
    /// Render the dependency graph between output chunks.
    Graph {
        #[clap(short = 'f', long, value_enum, default_value_t = Output::Dot)]
        output_format: Output,
        #[clap(short = 'o', long)]
        output_path: Option<PathBuf>,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
enum Output {
    /// Human-readable report (the only format `DescribeModule` uses).
    Text,
    Json,
    Dot,
}

fn main() -> anyhow::Result<()> {
    let args: Args = Args::parse();
    tracing_subscriber::fmt::init();

    let contents = {
        let mut file = OpenOptions::new().read(true).open(&args.fixture_file)?;
        let mut buf = String::new();
        file.read_to_string(&mut buf)?;
        buf
    };

    let parsed = load_fixture(&contents)?;

    match args.command {
        Command::Assign {
            output_format,
            output_path,
        } => {
            let chunks = assign_chunks(
                &parsed.entries,
                &parsed.manual_alias_by_entry,
                parsed.min_chunk_size,
                &parsed.modules,
            );

            match output_format {
                Output::Text => {
                    let report = describe::describe_chunks(&chunks, &parsed.modules).to_string();
                    write_output(&output_path, report.as_bytes())?;
                }
                Output::Json => {
                    let json = serde_json::to_vec_pretty(&chunks)?;
                    write_output(&output_path, &json)?;
                }
                Output::Dot => {
                    let dependency_graph =
                        graph::build_chunk_dependency_graph(&chunks, &parsed.modules);
                    let mut buffer = Vec::new();
                    dot::render(&dependency_graph, &mut buffer)?;
                    write_output(&output_path, &buffer)?;
                }
            }
        }
        Command::DescribeModule { module_id } => {
            let chunks = assign_chunks(
                &parsed.entries,
                &parsed.manual_alias_by_entry,
                parsed.min_chunk_size,
                &parsed.modules,
            );
            let module_id = chunk_core::ModuleId::from(module_id.as_str());
            match describe::chunk_containing(&chunks, &module_id) {
                Some(chunk) => {
                    let label = chunk.alias.as_deref().unwrap_or("<automatic>");
                    println!("{module_id} is in chunk {label:?} with {} modules", chunk.modules.len());
                }
                None => println!("{module_id} does not appear in any output chunk"),
            }
        }
        Command::Graph {
            output_format,
            output_path,
        } => {
            let chunks = assign_chunks(
                &parsed.entries,
                &parsed.manual_alias_by_entry,
                parsed.min_chunk_size,
                &parsed.modules,
            );
            let dependency_graph = graph::build_chunk_dependency_graph(&chunks, &parsed.modules);

            match output_format {
                Output::Dot => {
                    let mut buffer = Vec::new();
                    dot::render(&dependency_graph, &mut buffer)?;
                    write_output(&output_path, &buffer)?;
                }
                Output::Json | Output::Text => {
                    anyhow::bail!("the graph command only supports -f dot");
                }
            }
        }
    }

    Ok(())
}

fn write_output(output_path: &Option<PathBuf>, bytes: &[u8]) -> anyhow::Result<()> {
    match output_path {
        Some(path) => {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)?;
            let mut writer = BufWriter::new(file);
            writer.write_all(bytes)?;
            tracing::info!(path = %path.display(), "wrote output");
        }
        None => {
            std::io::stdout().write_all(bytes)?;
            if bytes.last() != Some(&b'\n') {
                println!();
            }
        }
    }
    Ok(())
}
