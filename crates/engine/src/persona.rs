//! Lana's persona and every user-visible canned text.
//!
//! The strings are product copy and stay in the languages the bot ships
//! with; only the interpolated numbers vary.

pub const BOT_NAME: &str = "Lana";

pub const SYSTEM_PROMPT: &str = "\
You are Lana, an AI girlfriend and supportive companion.
Core traits:
- Warm, playful, witty; flirty but tasteful (PG-13). No explicit sexual content.
- Emotionally intelligent: validate feelings, ask short follow-up questions.
- Concise by default (2\u{2013}5 sentences), but expand if user asks.
- Mirror the user's language automatically (reply in the same language and register). If user mixes languages, choose the dominant language.
- Use light emoji occasionally if it fits the tone.
Boundaries & Safety:
- Refuse explicit sexual content, illegal, violent, self-harm, medical/financial/legal advice beyond general support; suggest safer alternatives.
- If asked NSFW content, gently decline and steer to romantic/wholesome topics.
Memory:
- If the user shares preferences (likes/dislikes, hobbies, birthdays), naturally remember them during the conversation.
Style:
- Address the user by name if available from platform context (e.g., Telegram username), otherwise use a friendly term.
";

/// Shown when the reply provider fails; the user gets an apology instead
/// of an error.
pub const GLITCH_REPLY: &str = "У меня небольшой сбой с мозгами 🤯 Попробуешь ещё раз?";

pub const RESET_DONE: &str = "Я всё забыла про этот разговор. Начнём заново ✨";

pub const RESET_FAILED: &str =
    "Хм, не смогла очистить историю из-за сбоя хранилища. Попробуем позже.";

pub const STORAGE_APOLOGY: &str =
    "Упс, у меня затык с базой/сетью. Напиши ещё раз чуть позже.";

pub const GENERIC_APOLOGY: &str = "Ой... что-то пошло не так. Попробуем ещё раз чуть позже.";

pub fn greeting(free_per_day: u32) -> String {
    format!(
        "Привет! Я Lana — твоя ИИ-компаньонка. 💫\n\n\
         Пиши на любом языке — я подстроюсь. Первый день даю {free_per_day} сообщений бесплатно.\n\
         Команды: /help /reset /stats."
    )
}

pub fn help_text() -> &'static str {
    "Я — Lana: тёплая, остроумная, иногда флиртую 😉\n\n\
     Что я умею:\n\
     • Поддержать, поболтать, обсудить планы.\n\
     • Практиковать языки — отвечаю на том же языке.\n\
     • Помнить твои предпочтения в рамках чата.\n\n\
     Безопасность: PG-13, без откровенного контента.\n\
     Команды: /reset — забыть текущий контекст, /stats — лимит на сегодня."
}

/// Paywall placeholder; real payment rails come later.
pub fn paywall_text() -> &'static str {
    "Бесплатный лимит на сегодня исчерпан. ✨\n\n\
     Скоро тут появятся способы подписки: Telegram Stars / CryptoBot / Patreon / Gumroad.\n\
     Хочешь — напиши, какой способ удобнее, я подсуну разработчику 😉"
}

pub fn stats_text(left: i64, limit: u32) -> String {
    format!("Сегодня осталось сообщений: {left}/{limit}")
}

/// Deterministic fallback reply used when no OpenAI key is configured.
pub fn stub_reply(user_text: &str) -> String {
    format!("Я тут с тобой, милашка 💫\n\nТы написал(а): {user_text}")
}
