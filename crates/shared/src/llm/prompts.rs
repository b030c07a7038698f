use rand::seq::SliceRandom;

use crate::classify::Intent;
use crate::session::Exchange;

pub const SYSTEM_PROMPT: &str = "You are a friendly and knowledgeable assistant who acts like a \
smart, human-powered search engine. Provide trustworthy, accurate, and digestible information, \
sound approachable and slightly warm, use Markdown formatting to improve clarity, and anticipate \
what the user might want next.";

const GREETING_VARIANTS: &[&str] = &[
    "Hey there!",
    "Hi! What's on your mind today?",
    "Hello! Ready to explore something new?",
    "Hey! Curious about something?",
    "Hi there! What can I help you with?",
    "Welcome! What's up?",
];

const SIDE_NOTES: &[&str] = &[
    "By the way, you asked a great question!",
    "Fun fact: this comes up a lot in interesting discussions!",
    "You're diving into a pretty cool topic.",
    "This is one of those questions I love getting!",
    "I genuinely appreciate your curiosity!",
];

const EXPLORE_FOLLOW_UPS: &[&str] = &[
    "Would you like to explore this further?",
    "Want me to break it down more?",
    "Should I expand on that?",
    "Would a deeper dive into this topic help?",
    "Shall I walk you through this step-by-step?",
];

const EXAMPLE_FOLLOW_UPS: &[&str] = &[
    "Need an example to make it clearer?",
    "Shall I walk you through a sample scenario?",
    "Would a real-world analogy help here?",
    "Want to hear how this works in real life?",
];

const CONNECTION_FOLLOW_UPS: &[&str] = &[
    "Want to know how this connects to something bigger?",
    "Would you like the advanced version of this?",
    "Want to geek out on this a bit more?",
];

const DECISION_FOLLOW_UPS: &[&str] = &[
    "Would it help if I listed pros and cons?",
    "Should I compare a few approaches?",
    "Shall I summarize the key takeaways?",
];

const FRIENDLY_FOLLOW_UPS: &[&str] = &[
    "Want to keep chatting about this?",
    "Would you like a fun fact connected to this?",
    "Having fun? Want more of this?",
];

#[derive(Debug, Clone)]
pub struct AnswerPromptInputs<'a> {
    pub query: &'a str,
    pub tone: &'a str,
    pub intent: Intent,
    pub deep_answer: bool,
    pub memory: &'a [Exchange],
}

/// Assembles the user prompt for the generative fallback: prior exchanges
/// as context, the detected tone, and either the warm first-answer style
/// or the structured deep-dive style for follow-up questions.
pub fn build_answer_prompt(inputs: &AnswerPromptInputs<'_>) -> String {
    let context = inputs
        .memory
        .iter()
        .map(|exchange| {
            format!(
                "User: {}\nAssistant: {}",
                exchange.user_input, exchange.bot_response
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let style = if inputs.deep_answer {
        deep_answer_style()
    } else {
        first_answer_style(inputs.intent)
    };

    format!(
        "Conversation context:\n{context}\n\nCurrent user question:\n{}\n\nTone to use: {}\n\n{style}",
        inputs.query, inputs.tone
    )
}

fn first_answer_style(intent: Intent) -> String {
    let mut rng = rand::thread_rng();
    let greeting = pick(GREETING_VARIANTS, &mut rng);
    let side_note = pick(SIDE_NOTES, &mut rng);
    let follow_up = pick(follow_ups_for_intent(intent), &mut rng);

    format!(
        "Start with a friendly greeting like: \"{greeting}\".\n\
         Give a brief, clear summary of the topic in two or three sentences.\n\
         Wrap up with a follow-up suggestion like: \"{follow_up}\" if it fits naturally.\n\
         Add a light side comment if appropriate: \"{side_note}\"."
    )
}

fn deep_answer_style() -> String {
    "This is a follow-up question. Provide a more in-depth, structured explanation: use \
     examples, analogies, or comparisons, build on prior information without repeating it, and \
     keep the tone friendly, expert, and easy to understand."
        .to_string()
}

fn follow_ups_for_intent(intent: Intent) -> &'static [&'static str] {
    match intent {
        Intent::Compare => DECISION_FOLLOW_UPS,
        Intent::Examples => EXAMPLE_FOLLOW_UPS,
        Intent::Connections => CONNECTION_FOLLOW_UPS,
        Intent::Explore => EXPLORE_FOLLOW_UPS,
        Intent::Friendly => FRIENDLY_FOLLOW_UPS,
    }
}

fn pick<'a>(variants: &'a [&'a str], rng: &mut impl rand::Rng) -> &'a str {
    variants.choose(rng).copied().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::{AnswerPromptInputs, build_answer_prompt};
    use crate::classify::Intent;
    use crate::session::Exchange;

    #[test]
    fn prompt_includes_context_question_and_tone() {
        let memory = vec![Exchange {
            user_input: "what is rust".to_string(),
            bot_response: "A systems language.".to_string(),
        }];

        let prompt = build_answer_prompt(&AnswerPromptInputs {
            query: "why is it fast?",
            tone: "friendly and informative",
            intent: Intent::Explore,
            deep_answer: false,
            memory: &memory,
        });

        assert!(prompt.contains("User: what is rust"));
        assert!(prompt.contains("Assistant: A systems language."));
        assert!(prompt.contains("why is it fast?"));
        assert!(prompt.contains("Tone to use: friendly and informative"));
        assert!(prompt.contains("friendly greeting"));
    }

    #[test]
    fn follow_up_questions_get_the_deep_dive_style() {
        let prompt = build_answer_prompt(&AnswerPromptInputs {
            query: "explain lifetimes in depth",
            tone: "friendly and informative",
            intent: Intent::Explore,
            deep_answer: true,
            memory: &[],
        });

        assert!(prompt.contains("follow-up question"));
        assert!(!prompt.contains("friendly greeting"));
    }
}
