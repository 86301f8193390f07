//! Prompt templates
//!
//! Every prompt asks for a bare JSON object so the reply can be parsed
//! directly after code fences are stripped.

pub fn topic_analysis(topic: &str) -> String {
    format!(
        r#"Analyze the following topic/classification and provide a structured analysis:

Topic: "{topic}"

Provide your analysis in JSON format with the following structure:
{{
    "topic_summary": "Brief summary of the topic",
    "key_categories": ["list", "of", "relevant", "categories"],
    "search_keywords": ["list", "of", "search", "keywords"],
    "typical_domains": ["example domains that would fit this topic"],
    "industry": "primary industry classification"
}}

Only respond with valid JSON, no additional text."#
    )
}

pub fn website_candidates(topic: &str, count: usize, country: &str, language: &str) -> String {
    format!(
        r#"You are an expert at finding relevant websites for business and research purposes.

Topic/Classification: "{topic}"
Country: {country}
Language: {language}
Number of websites needed: {count}

Generate a list of real, legitimate websites that match this topic. These should be:
- Real, publicly accessible websites
- Relevant to the topic
- Likely to publish contact information (emails)
- Professional business or organization websites

Provide your response in JSON format:
{{
    "websites": [
        {{
            "url": "https://company.example",
            "relevance_score": 0.95,
            "description": "Brief description of the website",
            "category": "Primary category"
        }}
    ]
}}

Only respond with valid JSON, no additional text.
Include exactly {count} websites."#
    )
}

pub fn search_queries(topic: &str, count: usize) -> String {
    format!(
        r#"Generate {count} effective web search queries to find websites related to this topic:

Topic: "{topic}"

The queries should find business websites in this industry, related
organizations, service providers and professional associations.

Format your response as JSON:
{{
    "queries": ["query 1", "query 2", "query 3"]
}}

Only respond with valid JSON, no additional text."#
    )
}

pub fn alternative_topics(topic: &str, count: usize) -> String {
    format!(
        r#"Suggest {count} alternative or related topics to: "{topic}"

These should be related but distinct topics, more specific or broader
variations, or adjacent industries.

Respond in JSON format:
{{
    "suggestions": ["topic 1", "topic 2", "topic 3"]
}}

Only respond with valid JSON, no additional text."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_prompt_mentions_parameters() {
        let prompt = website_candidates("vegan bakeries", 7, "DE", "de");
        assert!(prompt.contains("\"vegan bakeries\""));
        assert!(prompt.contains("Country: DE"));
        assert!(prompt.contains("Language: de"));
        assert!(prompt.contains("Include exactly 7 websites."));
    }

    #[test]
    fn test_prompts_escape_braces() {
        assert!(topic_analysis("x").contains("\"topic_summary\""));
        assert!(search_queries("x", 3).contains("{\n    \"queries\""));
        assert!(alternative_topics("x", 3).starts_with("Suggest 3 alternative"));
    }
}
