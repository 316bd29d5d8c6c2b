//! Interactive collection of search criteria from the terminal.

use std::io::{self, BufRead, Write};

use crate::query::{QueryError, SearchMode, SearchQuery, parse_count};

const MODE_MENU: &str = "choose search type:\n\
    1 name\n\
    2 cuisine (Indian, Mexican, etc.)\n\
    3 diet (vegetarian, etc.)\n\
    4 intolerances (gluten for gluten free, etc.)\n";

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("input closed before all search criteria were entered")]
    Closed,

    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Search criteria already supplied on the command line. Missing pieces are prompted for.
#[derive(Debug, Default, Clone)]
pub struct Prefilled {
    pub mode: Option<SearchMode>,
    pub value: Option<String>,
    pub number: Option<u32>,
    pub offset: Option<u32>,
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `label` and read one line, without its line terminator.
    pub fn ask(&mut self, label: &str) -> Result<String, PromptError> {
        write!(self.output, "{label}")?;
        if !label.ends_with('\n') {
            write!(self.output, " ")?;
        }
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Closed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Ask for mode, count, offset, then the mode-specific value.
    ///
    /// An unknown mode is rejected immediately, before the remaining prompts.
    pub fn read_query(&mut self, prefilled: Prefilled) -> Result<SearchQuery, PromptError> {
        let mode = match prefilled.mode {
            Some(mode) => mode,
            None => SearchMode::from_selector(&self.ask(MODE_MENU)?)?,
        };
        let number = match prefilled.number {
            Some(n) => n,
            None => parse_count("number", &self.ask("Please enter number of recipes:")?)?,
        };
        let offset = match prefilled.offset {
            Some(n) => n,
            None => parse_count("offset", &self.ask("Please enter offset:")?)?,
        };
        let value = match prefilled.value {
            Some(v) => v,
            None => self.ask(mode.prompt_label())?,
        };
        Ok(SearchQuery::new(mode, value, number, offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompter(input: &str) -> Prompter<&[u8], Vec<u8>> {
        Prompter::new(input.as_bytes(), Vec::new())
    }

    #[test]
    fn reads_prompts_in_order() {
        let mut p = prompter("2\n5\n10\nItalian\n");
        let query = p.read_query(Prefilled::default()).unwrap();
        assert_eq!(query, SearchQuery::new(SearchMode::Cuisine, "Italian", 5, 10));

        let shown = String::from_utf8(p.output).unwrap();
        let menu = shown.find("choose search type").unwrap();
        let number = shown.find("number of recipes").unwrap();
        let offset = shown.find("offset").unwrap();
        let value = shown.find("Enter cuisine").unwrap();
        assert!(menu < number && number < offset && offset < value);
    }

    #[test]
    fn value_is_kept_verbatim_apart_from_line_ending() {
        let mut p = prompter("1\r\n3\r\n0\r\n  chicken tikka \r\n");
        let query = p.read_query(Prefilled::default()).unwrap();
        assert_eq!(query.value, "  chicken tikka ");
    }

    #[test]
    fn unknown_mode_fails_before_other_prompts() {
        let mut p = prompter("9\n5\n0\nx\n");
        let err = p.read_query(Prefilled::default()).unwrap_err();
        assert!(matches!(err, PromptError::Query(QueryError::UnknownMode(_))));

        let shown = String::from_utf8(p.output).unwrap();
        assert!(!shown.contains("number of recipes"));
    }

    #[test]
    fn invalid_count_is_rejected() {
        let mut p = prompter("1\nlots\n");
        let err = p.read_query(Prefilled::default()).unwrap_err();
        assert!(matches!(
            err,
            PromptError::Query(QueryError::InvalidNumber { field: "number", .. })
        ));
    }

    #[test]
    fn closed_input_is_reported() {
        let mut p = prompter("3\n");
        assert!(matches!(
            p.read_query(Prefilled::default()),
            Err(PromptError::Closed)
        ));
    }

    #[test]
    fn prefilled_values_skip_their_prompts() {
        let mut p = prompter("vegan\n");
        let prefilled = Prefilled {
            mode: Some(SearchMode::Diet),
            number: Some(2),
            offset: Some(4),
            value: None,
        };
        let query = p.read_query(prefilled).unwrap();
        assert_eq!(query, SearchQuery::new(SearchMode::Diet, "vegan", 2, 4));

        let shown = String::from_utf8(p.output).unwrap();
        assert_eq!(shown, "Enter diet ");
    }
}
