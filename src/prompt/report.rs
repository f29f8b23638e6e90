use crate::prompt::common::{current_date, DONT_TELL_ME, WRITE_IN_CLEAR_ENGLISH};
use crate::report::{CONCLUSION_MIN_WORDS, REQUIRED_SECTIONS};

/// Generate a prompt turning a cluster analysis into a structured Markdown report
pub fn report_prompt(analysis: &str) -> String {
    let [facts, conflicts, research, conclusion] = REQUIRED_SECTIONS;

    // Analysis goes last so the prompt cap never drops the section headings
    format!(
        r#"Create a comprehensive report from the analysis of related news articles below.
Today's date: {date}

Follow this structure, in Markdown, using these section headings word for word:
1. **{facts}** (bullet points)
2. **{conflicts}** (subsections if needed)
3. **{research}** (specific questions)
4. **{conclusion}** ({min_words}+ words)

Maintain consistent section lengths.
{language}
{dont_tell_me}
## ANALYSIS:
~~~
{analysis}
~~~"#,
        date = current_date(),
        analysis = analysis.trim(),
        facts = facts,
        conflicts = conflicts,
        research = research,
        conclusion = conclusion,
        min_words = CONCLUSION_MIN_WORDS,
        language = WRITE_IN_CLEAR_ENGLISH,
        dont_tell_me = DONT_TELL_ME
    )
}
