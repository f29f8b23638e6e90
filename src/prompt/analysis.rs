use crate::prompt::common::{current_date, DONT_TELL_ME, WRITE_IN_CLEAR_ENGLISH};

/// Generate a prompt for the combined fact/conflict analysis of one story cluster
pub fn analysis_prompt(contents: &[String]) -> String {
    let articles = contents
        .iter()
        .enumerate()
        .map(|(index, content)| {
            format!(
                "## ARTICLE {}:\n----------\n{}\n----------",
                index + 1,
                content.trim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    // Articles go last so the prompt cap only ever trims article text
    format!(
        r#"Analyze these news articles with strict formatting. They all report on the same story.
Today's date: {date}

IMPORTANT INSTRUCTIONS:
* **Analyze ONLY the articles below.**
* **Compare the articles against each other and note where they disagree.**

Output a JSON object with exactly these keys:
- "facts": list of verified facts supported by the articles
- "conflicts": detailed analysis of claims that differ between articles
- "missing_info": specific missing details, each with a research question
- "entities": key people and organizations
- "summary": a 100-word overview
{language}
{dont_tell_me}
{articles}"#,
        date = current_date(),
        articles = articles,
        language = WRITE_IN_CLEAR_ENGLISH,
        dont_tell_me = DONT_TELL_ME
    )
}
