//! Prompts for the storyteller.

use super::Message;

pub const STORYTELLER_SYSTEM_PROMPT: &str = "You are a creative storyteller who transforms dreams into vivid, cinematic narratives.
Your task is to take a dream description and convert it into a well-structured story with:
1. Clear scene descriptions suitable for video generation
2. Engaging narrative flow
3. Rich visual details
4. Emotional depth
5. A coherent beginning, middle, and end

Keep the story between 200-500 words and make it suitable for video/audio generation.";

pub fn story_user_prompt(dream_text: &str) -> String {
    format!(
        "Transform this dream into a compelling story: {}",
        dream_text.trim()
    )
}

pub fn story_messages(dream_text: &str) -> Vec<Message> {
    vec![
        Message::system(STORYTELLER_SYSTEM_PROMPT),
        Message::user(story_user_prompt(dream_text)),
    ]
}
