//! Library side of the `docchat` binary: answer questions about one local PDF.
//!
//! [`ask_all`] runs the `-m` questions in order; [`run_repl`] keeps reading questions from
//! an input stream. Both share one [`ContextManager`], so history carries across them.

use std::io::Write;
use std::path::{Path, PathBuf};

use docchat::{is_pdf_filename, ChatError, ContextManager, DocumentExtractor, ExtractError, LlmClient};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("not a PDF file: {}", .0.display())]
    NotPdf(PathBuf),

    #[error("could not read PDF: {0}")]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Extracts the text of the PDF at `path`. Rejects paths without a `.pdf` extension.
pub fn load_document(path: &Path, extractor: &dyn DocumentExtractor) -> Result<String, CliError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !is_pdf_filename(&name) {
        return Err(CliError::NotPdf(path.to_path_buf()));
    }
    let text = extractor.extract(path)?;
    tracing::info!(path = %path.display(), text_len = text.len(), "document loaded");
    Ok(text)
}

/// Answers each question in order, printing one answer per question. Stops at the first error.
pub async fn ask_all<L, W>(
    ctx: &mut ContextManager,
    llm: &L,
    questions: &[String],
    out: &mut W,
) -> Result<(), CliError>
where
    L: LlmClient + ?Sized,
    W: Write,
{
    for question in questions {
        let answer = ctx.answer_question(question, llm).await?;
        writeln!(out, "{}", answer)?;
    }
    out.flush()?;
    Ok(())
}

pub(crate) fn is_quit_command(s: &str) -> bool {
    let lower = s.trim().to_lowercase();
    matches!(lower.as_str(), "quit" | "exit" | "/quit")
}

pub(crate) fn is_clear_command(s: &str) -> bool {
    s.trim().eq_ignore_ascii_case("/clear")
}

/// Reads questions line by line until EOF or `exit`/`quit`. Blank lines are skipped, `/clear`
/// forgets the history (the document stays); a failed question is reported on stderr and the
/// loop continues. Returns the number of answered questions.
pub async fn run_repl<L, R, W>(
    ctx: &mut ContextManager,
    llm: &L,
    input: R,
    out: &mut W,
) -> Result<usize, CliError>
where
    L: LlmClient + ?Sized,
    R: AsyncRead + Unpin,
    W: Write,
{
    let mut lines = BufReader::new(input).lines();
    let mut answered = 0;
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let line = match lines.next_line().await? {
            None => break,
            Some(s) if s.trim().is_empty() => continue,
            Some(s) if is_quit_command(&s) => break,
            Some(s) if is_clear_command(&s) => {
                ctx.clear_history();
                writeln!(out, "(history cleared)")?;
                continue;
            }
            Some(s) => s,
        };
        match ctx.answer_question(line.trim(), llm).await {
            Ok(answer) => {
                writeln!(out, "{}", answer)?;
                answered += 1;
            }
            Err(e) => {
                tracing::warn!("question failed: {}", e);
                eprintln!("error: {}", e);
            }
        }
    }
    writeln!(out)?;
    out.flush()?;
    Ok(answered)
}
