/// Generate a prompt asking the model to group article titles by story
pub fn clustering_prompt(titles: &[String]) -> String {
    let listing = titles
        .iter()
        .enumerate()
        .map(|(index, title)| format!("{}: {}", index, title.trim()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Group these news titles by story similarity. Titles describing the same underlying event or story belong in the same group.

## TITLES:
----------
{listing}
----------

Return JSON with groups of title indices like {{"groups": [[0, 1], [2], [3]]}}.
* Every index must be one of the integers listed above.
* Put each title in exactly one group.
* A title that matches no other title forms a group of its own.
* Output only the JSON object."#,
        listing = listing
    )
}
