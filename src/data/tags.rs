//! HTML tag to LaTeX fragment table
//!
//! Each supported tag maps to the text emitted at its start tag and at its end
//! tag. Tags missing from the table use [`FALLBACK`], a bare brace group.

use phf::phf_map;

/// LaTeX emitted for one HTML tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagRule {
    /// Emitted at the start tag
    pub open: &'static str,
    /// Emitted at the end tag
    pub close: &'static str,
}

/// Rule for every tag not present in [`HTML_TAGS`].
pub const FALLBACK: TagRule = TagRule {
    open: "{",
    close: "}",
};

/// Supported HTML tags, keyed by lower-case tag name
pub static HTML_TAGS: phf::Map<&'static str, TagRule> = phf_map! {
    // Headings
    "h1" => TagRule { open: "\\section{", close: "}" },
    "h2" => TagRule { open: "\\subsection{", close: "}" },
    "h3" => TagRule { open: "\\subsubsection{", close: "}" },

    // Inline
    "i" => TagRule { open: "\\textemph{", close: "}" },

    // Blocks
    "div" => TagRule { open: "\n\n{", close: "}" },
    "hr" => TagRule {
        open: "\n\n--------------------------------------------------------------------------------\n\n",
        close: "",
    },

    // Lists
    "ul" => TagRule { open: "\\begin{itemize}", close: "\\end{itemize}" },
    "ol" => TagRule { open: "\\begin{enumerate}", close: "\\end{enumerate}" },
    "li" => TagRule { open: "\\item{", close: "}" },
};

/// Look up the rule for a tag name, falling back to a brace group.
pub fn tag_rule(name: &str) -> TagRule {
    HTML_TAGS.get(name).copied().unwrap_or(FALLBACK)
}
