//! Prompt builders for the generated fields
//!
//! Each blank field the pipeline can fill has its own prompt. The summary and
//! short-title prompts spell out the counting rule (every letter, space and
//! punctuation mark counts as one unit) because the budgets downstream are
//! enforced with exactly that rule.

/// Summary prompt for an uploaded markdown document
#[must_use]
pub fn summary(limit: usize) -> String {
    format!(
        "请帮我总结我提供的Markdown文档，总字数严格限制在{limit}字以内。\
         请注意：一个英文字母、一个空格、一个标点符号都算一个字。只输出总结正文。"
    )
}

/// Topic-tag prompt for an uploaded markdown document
#[must_use]
pub fn tags() -> String {
    "请根据我提供的Markdown文档提炼5到10个主题标签，按 [标签1, 标签2, 标签3] \
     的形式输出在一行内。标签要简短，不要包含连字符，不要输出其他内容。"
        .to_string()
}

/// Topic-tag prompt when no document is available, grounded in the title
#[must_use]
pub fn tags_for_title(title: &str) -> String {
    format!(
        "请根据文章标题「{title}」提炼5到10个主题标签，按 [标签1, 标签2, 标签3] \
         的形式输出在一行内。标签要简短，不要包含连字符，不要输出其他内容。"
    )
}

/// Short-title prompt for titles over the platform threshold
#[must_use]
pub fn short_title(title: &str, limit: usize) -> String {
    format!(
        "请将文章标题「{title}」压缩为不超过{limit}个字的短标题。\
         请注意：一个英文字母、一个空格、一个标点符号都算一个字。只输出短标题本身。"
    )
}

/// Cover-image prompt brief for an uploaded markdown document
///
/// Asks for a single English text-to-image prompt; the article platforms all
/// want a 16:9 cover without embedded text.
#[must_use]
pub fn cover_brief() -> String {
    "You are an expert in text-to-image prompt engineering. \
     I have attached a Markdown file containing an article for publication. \
     Read the file to understand the article's content, theme and filename, \
     ignoring any code blocks, command-line examples or technical syntax. \
     Summarize the main subject and mood, then produce one single \
     high-quality English prompt for a text-to-image model. The image must \
     work as an article cover: aspect ratio 16:9, professional, clean and \
     visually appealing, with a clear subject aligned to the article's theme \
     and no text, code snippets, logos or watermarks. \
     Output only the final prompt in English, with no explanations."
        .to_string()
}

/// Cover-image prompt brief grounded only in the title
#[must_use]
pub fn cover_brief_for_title(title: &str) -> String {
    format!(
        "You are an expert in text-to-image prompt engineering. \
         Produce one single high-quality English prompt for a text-to-image \
         model, for the cover of an article titled \"{title}\". The image \
         must work as an article cover: aspect ratio 16:9, professional, \
         clean and visually appealing, with a clear subject aligned to the \
         title's theme and no text, logos or watermarks. \
         Output only the final prompt in English, with no explanations."
    )
}
