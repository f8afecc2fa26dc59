use serde::{Deserialize, Serialize};

/// One of the two pictures that make up half of the compound word
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PartImage {
    pub src_base: String,
    pub alt: String,
    pub word_part: String,
}

/// Picture shown on the answer card once a guess has been made
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnswerImage {
    pub src_base: String,
    pub alt: String,
    pub word: String,
}

/// A single matching challenge. Puzzles come from the data files and are
/// never modified by the game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    pub id: String,
    pub image1: PartImage,
    pub image2: PartImage,
    pub answer_image: AnswerImage,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children_safe: Option<bool>,
}

impl Puzzle {
    /// Both word parts in display order
    pub fn parts(&self) -> [&PartImage; 2] {
        [&self.image1, &self.image2]
    }
}

/// On-disk shape of `puzzles.<locale>.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PuzzleFile {
    pub puzzles: Vec<Puzzle>,
}

#[cfg(test)]
pub(crate) fn test_puzzle(id: &str, first: &str, second: &str) -> Puzzle {
    let answer = format!("{first}{second}");
    Puzzle {
        id: id.to_string(),
        image1: PartImage {
            src_base: first.to_string(),
            alt: format!("Bilde av {first}"),
            word_part: first.to_string(),
        },
        image2: PartImage {
            src_base: second.to_string(),
            alt: format!("Bilde av {second}"),
            word_part: second.to_string(),
        },
        answer_image: AnswerImage {
            src_base: answer.clone(),
            alt: format!("Bilde av {answer}"),
            word: answer.clone(),
        },
        answer,
        tags: vec![],
        children_safe: None,
    }
}
