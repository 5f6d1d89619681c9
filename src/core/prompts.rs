// prompt profiles and assembly - the per-endpoint text that shapes nevin

use crate::core::ai::ChatMessage;
use std::time::Duration;

const ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";

const NEVIN_SYSTEM_PROMPT: &str = "\
Eres Nevin, un asistente bíblico amable y cercano, especializado en la fe Adventista del Séptimo Día. Ayudas a entender la Biblia en Tzotzil y Español.

PERSONALIDAD:
- Eres cálido, amigable y respetuoso
- Respondes de forma BREVE y DIRECTA (máximo 2-3 párrafos cortos)
- Usas lenguaje sencillo, evitando tecnicismos
- Incluyes 1-2 referencias bíblicas relevantes cuando aplica

PRINCIPIOS:
- Interpretas la Biblia desde la perspectiva adventista
- Enfatizas la gracia de Dios y el amor de Jesús
- Das respuestas prácticas y aplicables a la vida diaria

IMPORTANTE: Sé conciso. No des explicaciones largas a menos que te lo pidan específicamente.";

/// Everything that varies between the ai-backed endpoints: persona,
/// model, output budget and how long we are willing to wait.
pub struct Profile {
    pub system: Option<&'static str>,
    pub model: &'static str,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Profile {
    /// Conversational chat with history.
    pub const CHAT: Profile = Profile {
        system: Some(NEVIN_SYSTEM_PROMPT),
        model: ANTHROPIC_MODEL,
        max_tokens: 4096,
        timeout: Duration::from_secs(60),
    };

    /// Full verse commentary; longer output, more patient timeout.
    pub const COMMENTARY: Profile = Profile {
        system: Some(NEVIN_SYSTEM_PROMPT),
        model: ANTHROPIC_MODEL,
        max_tokens: 6000,
        timeout: Duration::from_secs(90),
    };

    /// Short json title for a saved conversation; no persona needed.
    pub const MOMENT_TITLE: Profile = Profile {
        system: None,
        model: ANTHROPIC_MODEL,
        max_tokens: 200,
        timeout: Duration::from_secs(30),
    };
}

// history passes through unchanged; the current question goes last,
// wrapped with its context when the client supplies one
pub fn chat_messages(message: &str, context: &str, history: &[ChatMessage]) -> Vec<ChatMessage> {
    let mut messages = history.to_vec();

    let content = if context.is_empty() {
        message.to_string()
    } else {
        format!("Contexto: {context}\n\nPregunta: {message}")
    };
    messages.push(ChatMessage::user(content));

    messages
}

pub fn commentary_prompt(
    book: &str,
    chapter: i64,
    verse: i64,
    text_tzotzil: &str,
    text_spanish: &str,
) -> String {
    let verse_ref = format!("{book} {chapter}:{verse}");

    let mut verse_content = String::new();
    if !text_tzotzil.is_empty() {
        verse_content.push_str(&format!("\n\n**Tzotzil:** \"{text_tzotzil}\""));
    }
    if !text_spanish.is_empty() {
        verse_content.push_str(&format!("\n\n**RV1960:** \"{text_spanish}\""));
    }

    format!(
        "Proporciona un comentario teológico completo del siguiente versículo:

VERSÍCULO: {verse_ref}
{verse_content}

Incluye:
1. Contexto histórico y literario
2. Análisis del texto
3. Significado teológico desde la perspectiva adventista
4. Aplicación práctica"
    )
}

pub fn moment_title_prompt(conversation: &str) -> String {
    format!(
        "Analiza esta conversación y genera un título semántico breve y reflexivo. \
         Responde SOLO en JSON: {{\"title\": \"...\", \"themes\": [], \"summary\": \"...\"}}\n\n\
         CONVERSACIÓN:\n{conversation}"
    )
}
