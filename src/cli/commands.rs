//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use crate::annotation::read_annotated_message_with;
use crate::cli::output::{
    OutputFormat, format_annotation, format_media, format_payloads, format_segments,
    format_text, format_title,
};
use crate::cli::parser::{Cli, Commands};
use crate::compose::BlockWriter;
use crate::core::{BlockMeta, BlockType};
use crate::dispatch::dispatch_all;
use crate::error::{CommandError, Result};
use crate::extract::{
    DEFAULT_STRIP_TYPES, MediaKind, extract_media_with, extract_title_with, strip_blocks_with,
};
use crate::io::{read_file, read_input, read_stdin};
use crate::parser::Parser;
use crate::render::{TextRenderer, render_text_with};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if the input cannot be read or the command fails.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);
    let config = cli.parser_config();
    if config.max_header_len == 0 {
        return Err(CommandError::InvalidArgument("--max-header-len must be positive".to_string()).into());
    }
    let parser = Parser::with_config(config);
    debug!(?config, "executing command");

    match &cli.command {
        Commands::Parse { file, dispatch } => cmd_parse(&parser, file.as_deref(), *dispatch, format),
        Commands::Render {
            file,
            expand_thinking,
        } => cmd_render(&parser, file.as_deref(), *expand_thinking, format),
        Commands::Title { file } => cmd_title(&parser, file.as_deref(), format),
        Commands::Media { files, kind } => cmd_media(&parser, files, *kind, format),
        Commands::Annotation { file } => cmd_annotation(&parser, file.as_deref(), format),
        Commands::Compose {
            block_type,
            lang,
            body,
        } => cmd_compose(&parser, block_type, lang.as_deref(), body.as_deref(), format),
        Commands::Strip { file, types } => cmd_strip(&parser, file.as_deref(), types, format),
    }
}

fn cmd_parse(
    parser: &Parser,
    file: Option<&Path>,
    dispatch: bool,
    format: OutputFormat,
) -> Result<String> {
    let input = read_input(file)?;
    let segments = parser.parse(&input);
    if dispatch {
        Ok(format_payloads(&dispatch_all(&segments), format))
    } else {
        Ok(format_segments(&segments, format))
    }
}

fn cmd_render(
    parser: &Parser,
    file: Option<&Path>,
    expand_thinking: bool,
    format: OutputFormat,
) -> Result<String> {
    let input = read_input(file)?;
    let renderer = TextRenderer::new()
        .expand_thinking(expand_thinking)
        .preview_len(parser.config().preview_len);
    let text = render_text_with(parser, renderer, &input);
    Ok(format_text(&text, format))
}

fn cmd_title(parser: &Parser, file: Option<&Path>, format: OutputFormat) -> Result<String> {
    let input = read_input(file)?;
    Ok(format_title(&extract_title_with(parser, &input), format))
}

fn cmd_media(
    parser: &Parser,
    files: &[PathBuf],
    kind: Option<MediaKind>,
    format: OutputFormat,
) -> Result<String> {
    let messages = if files.is_empty() {
        vec![read_stdin()?]
    } else {
        files
            .iter()
            .map(read_file)
            .collect::<Result<Vec<_>>>()?
    };

    let library = extract_media_with(parser, &messages);
    let library = match kind {
        Some(kind) => library.only(kind),
        None => library,
    };
    Ok(format_media(&library, format))
}

fn cmd_annotation(parser: &Parser, file: Option<&Path>, format: OutputFormat) -> Result<String> {
    let input = read_input(file)?;
    Ok(format_annotation(
        &read_annotated_message_with(parser, &input),
        format,
    ))
}

fn cmd_compose(
    parser: &Parser,
    block_type: &str,
    lang: Option<&str>,
    body: Option<&str>,
    format: OutputFormat,
) -> Result<String> {
    let block_type = block_type.trim();
    if block_type.is_empty() {
        return Err(CommandError::MissingArgument("--type".to_string()).into());
    }

    let body = match body {
        Some(body) => body.to_string(),
        None => read_stdin()?,
    };

    let mut meta = BlockMeta::new(block_type);
    if let Some(lang) = lang {
        meta = meta.with_lang(lang);
    }

    let writer = BlockWriter::new().with_max_header_len(parser.config().max_header_len);
    let block = writer.write(&meta, &body)?;
    Ok(format_text(&block, format))
}

fn cmd_strip(
    parser: &Parser,
    file: Option<&Path>,
    types: &[String],
    format: OutputFormat,
) -> Result<String> {
    let input = read_input(file)?;
    let types: Vec<BlockType> = if types.is_empty() {
        DEFAULT_STRIP_TYPES.to_vec()
    } else {
        types.iter().map(|name| BlockType::from_name(name)).collect()
    };
    Ok(format_text(&strip_blocks_with(parser, &input, &types), format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_input(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_cmd_parse() {
        let file = temp_input(r#"hi [BLOCK:{"type":"code"}]x[/BLOCK]"#);
        let output = cmd_parse(&Parser::new(), Some(file.path()), false, OutputFormat::Text).unwrap();
        assert!(output.contains("code"));
        assert!(output.contains("hi"));
    }

    #[test]
    fn test_cmd_parse_dispatch() {
        let file = temp_input(r#"[BLOCK:{"type":"table"}]{"headers":["a"],"rows":[["1"]]}[/BLOCK]"#);
        let output = cmd_parse(&Parser::new(), Some(file.path()), true, OutputFormat::Text).unwrap();
        assert!(output.contains("1 columns, 1 rows"));
    }

    #[test]
    fn test_cmd_title_json() {
        let file = temp_input(r#"[BLOCK:{"type":"title"}]T[/BLOCK] body"#);
        let output = cmd_title(&Parser::new(), Some(file.path()), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["title"], "T");
        assert_eq!(value["cleaned"], "body");
    }

    #[test]
    fn test_cmd_media_multiple_files() {
        let a = temp_input(r#"[BLOCK:{"type":"images"}]{"images":["a.png"]}[/BLOCK]"#);
        let b = temp_input(r#"[BLOCK:{"type":"images"}]{"images":["b.png"]}[/BLOCK]"#);
        let files = vec![a.path().to_path_buf(), b.path().to_path_buf()];
        let output = cmd_media(&Parser::new(), &files, None, OutputFormat::Text).unwrap();
        assert!(output.contains("Images (2):"));
        let a_pos = output.find("a.png").unwrap();
        let b_pos = output.find("b.png").unwrap();
        assert!(a_pos < b_pos);
    }

    #[test]
    fn test_cmd_compose() {
        let output = cmd_compose(&Parser::new(), "code", Some("rust"), Some("fn main() {}"), OutputFormat::Text)
            .unwrap();
        assert_eq!(
            output,
            "[BLOCK:{\"type\":\"code\",\"lang\":\"rust\"}]\nfn main() {}\n[/BLOCK]\n"
        );
    }

    #[test]
    fn test_cmd_compose_rejects_empty_type() {
        let result = cmd_compose(&Parser::new(), " ", None, Some("x"), OutputFormat::Text);
        assert!(result.is_err());
    }

    #[test]
    fn test_cmd_strip_default_types() {
        let file = temp_input(
            r#"[BLOCK:{"type":"RAGItem"}]{"filename":"a"}[/BLOCK] keep [BLOCK:{"type":"title"}]T[/BLOCK]"#,
        );
        let output = cmd_strip(&Parser::new(), Some(file.path()), &[], OutputFormat::Text).unwrap();
        assert_eq!(output, "keep [BLOCK:{\"type\":\"title\"}]T[/BLOCK]\n");
    }

    #[test]
    fn test_execute_rejects_zero_header_bound() {
        let cli = <Cli as clap::Parser>::try_parse_from(["blockstream", "--max-header-len", "0", "title"])
            .unwrap();
        let result = execute(&cli);
        assert!(matches!(
            result,
            Err(crate::error::Error::Command(CommandError::InvalidArgument(_)))
        ));
    }

    #[test]
    fn test_cmd_missing_file() {
        let result = cmd_title(&Parser::new(), Some(Path::new("/nonexistent/input.txt")), OutputFormat::Text);
        assert!(result.is_err());
    }
}
