//! Prompt Builder
//!
//! Section-based prompt construction. The slide extraction prompt asks the model
//! for a bare JSON array so the response extractor has as little to strip as
//! possible.

use crate::constants::slide::MAX_ARGUMENTS;

/// Prompt section types
#[derive(Debug, Clone)]
pub enum PromptSection {
    /// Task statement opening the prompt
    Task(String),
    /// Numbered requirements
    Requirements(Vec<String>),
    /// Raw text section with optional header
    Text {
        header: Option<String>,
        content: String,
    },
    /// Fenced block with language tag
    Code { language: String, content: String },
    /// Free-form text
    Custom(String),
}

/// Prompt builder for consistent prompt construction
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the task statement
    pub fn task(mut self, task: &str) -> Self {
        self.sections.push(PromptSection::Task(task.to_string()));
        self
    }

    /// Add numbered requirements
    pub fn requirements<S: AsRef<str>>(mut self, requirements: &[S]) -> Self {
        self.sections.push(PromptSection::Requirements(
            requirements.iter().map(|r| r.as_ref().to_string()).collect(),
        ));
        self
    }

    /// Add text section with header
    pub fn section(mut self, header: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: Some(header.to_string()),
            content: content.to_string(),
        });
        self
    }

    /// Add code block
    pub fn code(mut self, language: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Code {
            language: language.to_string(),
            content: content.to_string(),
        });
        self
    }

    /// Add custom section
    pub fn custom(mut self, content: &str) -> Self {
        self.sections.push(PromptSection::Custom(content.to_string()));
        self
    }

    /// Build the final prompt string
    pub fn build(self) -> String {
        let mut prompt = String::new();

        for section in self.sections {
            match section {
                PromptSection::Task(task) => {
                    prompt.push_str(&task);
                    prompt.push_str("\n\n");
                }
                PromptSection::Requirements(requirements) => {
                    prompt.push_str("Requirements:\n");
                    for (i, req) in requirements.iter().enumerate() {
                        prompt.push_str(&format!("{}. {}\n", i + 1, req));
                    }
                    prompt.push('\n');
                }
                PromptSection::Text { header, content } => {
                    if let Some(h) = header {
                        prompt.push_str(&format!("{}:\n", h));
                    }
                    prompt.push_str(&content);
                    prompt.push_str("\n\n");
                }
                PromptSection::Code { language, content } => {
                    prompt.push_str(&format!("```{}\n", language));
                    prompt.push_str(&content);
                    prompt.push_str("\n```\n\n");
                }
                PromptSection::Custom(content) => {
                    prompt.push_str(&content);
                    prompt.push_str("\n\n");
                }
            }
        }

        prompt.trim_end().to_string()
    }
}

const EXAMPLE_OUTPUT: &str = r#"[
  {
    "title": "AI in Practice",
    "coreIdea": "AI is reshaping everyday work",
    "arguments": ["Machine learning breakthroughs", "Deep learning applications", "Natural language processing"]
  }
]"#;

/// Preset prompt templates
pub struct PromptTemplates;

impl PromptTemplates {
    /// Prompt asking the model to split `text` into slide objects
    pub fn slide_parsing(text: &str) -> String {
        PromptBuilder::new()
            .task("Parse the following text into presentation slides and return strictly formatted JSON.")
            .requirements(&[
                "The response must be a valid JSON array".to_string(),
                "Each slide object has: title, coreIdea, arguments (array of strings)".to_string(),
                "Keep each title within 15 characters".to_string(),
                "Summarize the core idea in one sentence".to_string(),
                format!(
                    "Provide 3-{} arguments per slide, each under 20 characters",
                    MAX_ARGUMENTS
                ),
                "Do not include any explanation, return only the JSON".to_string(),
            ])
            .custom("Example output:")
            .code("json", EXAMPLE_OUTPUT)
            .section("Text to parse", text)
            .custom("Follow the requirements above and return a valid JSON array only.")
            .build()
    }
}
