//! Analysis prompt construction.
//!
//! The prompt lists the taxonomy labels and the delimiter markers taken from
//! the same values the response parser is built with, so classification and
//! extraction agree with what the model was asked to produce. Wording is
//! Chinese to match the default labels; content is forwarded whole.

use crate::model::taxonomy::Taxonomy;
use crate::parser::response::Delimiters;

/// Builds the instruction prompt for one piece of pasted content.
pub fn build_analysis_prompt(content: &str, taxonomy: &Taxonomy, delimiters: &Delimiters) -> String {
    let mut labels: Vec<&str> = taxonomy.categories().iter().map(String::as_str).collect();
    labels.push(taxonomy.fallback());

    let mut prompt = String::from("你是一个学习专家。请针对以下内容：\n");
    prompt.push_str(&format!(
        "1. 归类为其中之一（{}），原样写出所选标签。\n",
        labels.join("/")
    ));
    prompt.push_str("2. 提炼核心大纲（3-5点）。\n");
    prompt.push_str("3. 给出1-3条两分钟内就能开始的实操建议。\n");
    prompt.push_str(&format!(
        "把实操建议每行一条，写在单独一行 `{}` 与单独一行 `{}` 之间，放在归类和大纲之后；`{}` 之后不要再写内容。\n\n",
        delimiters.start, delimiters.end, delimiters.end
    ));

    prompt.push_str("内容如下：\n");
    prompt.push_str(content.trim());
    prompt
}

#[cfg(test)]
mod tests {
    use super::build_analysis_prompt;
    use crate::model::taxonomy::Taxonomy;
    use crate::parser::response::Delimiters;

    #[test]
    fn prompt_lists_labels_in_priority_order_and_markers() {
        let taxonomy = Taxonomy::new(["B-topic", "A-topic"], "other").unwrap();
        let prompt = build_analysis_prompt("caption", &taxonomy, &Delimiters::default());

        assert!(prompt.contains("B-topic/A-topic/other"));
        assert!(prompt.contains("---ACTION_START---"));
        assert!(prompt.contains("---ACTION_END---"));
        assert!(prompt.ends_with("caption"));
    }

    #[test]
    fn prompt_forwards_long_content_whole() {
        let long = format!("{}end-marker", "x".repeat(20_000));
        let prompt = build_analysis_prompt(&long, &Taxonomy::default(), &Delimiters::default());
        let tail = prompt.rsplit("内容如下：\n").next().unwrap();
        assert_eq!(tail, long);
    }

    #[test]
    fn default_prompt_uses_default_labels() {
        let prompt = build_analysis_prompt("c", &Taxonomy::default(), &Delimiters::default());
        assert!(prompt.contains("AI应用/跳舞/职场英语/其他"));
    }
}
