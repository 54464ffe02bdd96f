// Prompt templates for every question category.
// Instruction blocks are sent verbatim; the resume text is appended after
// a "Resume text:" header. `{question}` is replaced with the user's utterance.

use crate::actions::Category;

const QUESTION_PLACEHOLDER: &str = "{question}";

pub const SKILLS_INSTRUCTIONS: &str = concat!(
    "From the given resume, extract all skills exactly as written.\n\n",
    "✅ If the resume already categorizes skills (e.g., Technical Skills, Soft Skills, Tools, etc.), ",
    "retain the same categories and formatting.\n",
    "✅ If no categorization is present, then organize the extracted skills into two groups: ",
    "Technical Skills and Soft Skills.\n",
    "❌ Do not assume, interpret, or add any skills not explicitly mentioned.\n",
    "❌ Only include content from the Skills section(s) of the resume. ",
    "Ignore skills implied elsewhere (e.g., in projects or experience).\n\n",
);

pub const SUMMARY_INSTRUCTIONS: &str = concat!(
    "Extract the Professional Summary of the candidate from the given resume.\n",
    "✅ If a summary/profile/objective section is explicitly written in the resume, ",
    "extract that exact content only.\n",
    "✅ If not available, generate a concise and professional summary based solely on ",
    "the actual content of the resume, including:\n",
    "- Key strengths\n- Experience level\n- Notable achievements\n",
    "- Overall profile and areas of expertise\n",
    "❌ Do not assume or add anything not present in the resume.\n",
    "❌ No filler or generalizations — strictly base it on resume content.\n\n",
);

pub const EXPERIENCE_INSTRUCTIONS: &str = concat!(
    "Analyze the following resume and extract only the Work Experience details.\n",
    "✅ For each experience, provide:\n",
    "- Job Title\n- Company Name\n- Duration (Start – End)\n",
    "- Key Responsibilities (as bullet points, if available) or summary or description given in resume\n",
    "✅ Present the experiences in reverse chronological order (most recent first).\n",
    "❌ Do not include internship/project/volunteer experience unless it's under the Work Experience heading.\n",
    "❌ No summaries, no assumptions. Only extract what’s written in the resume.\n\n",
);

pub const TECH_STACK_INSTRUCTIONS: &str = concat!(
    "From the given resume, extract only the technologies listed under the 'Skills' section.\n",
    "✅ Categorize them clearly into,\n",
    "- Programming Languages\n- Frameworks/Libraries\n- Databases\n- Tools\n- Platforms/Cloud\n",
    "✅ Include proficiency levels if mentioned.\n",
    "❌ Do not include any technologies outside the 'Skills' section.\n",
    "❌ No assumptions or additions. Just what's explicitly listed.\n",
);

pub const EDUCATION_INSTRUCTIONS: &str = concat!(
    "Extract the following educational details from the given resume:\n",
    "- Degree name\n- Institution name\n- Graduation year\n- CGPA (if mentioned)\n",
    "⚠️ Only return these four fields.\n",
);

pub const CONTACT_INSTRUCTIONS: &str = concat!(
    "Extract contact information from this resume.\n",
    "Include name, email, phone number, location, LinkedIn profile, and any other contact details.\n",
    "Present in a clean, organized format.\n",
);

/// Contact is the one template with text after the resume.
pub const CONTACT_TRAILER: &str = "\nPlease provide contact information.";

pub const PROJECTS_INSTRUCTIONS: &str = concat!(
    "Extract detailed Project information from the given resume.\n",
    "✅ For each project, include:\n",
    "- Project Name\n- Description (as written)\n- Technologies Used\n",
    "- Duration (if mentioned)\n- Outcomes or Results (if mentioned)\n",
    "✅ Maintain the exact structure, wording, and formatting from the resume where available.\n",
    "❌ Do not summarize or infer anything that isn’t explicitly stated.\n",
    "❌ Only pull information from the Projects section (not from Experience or elsewhere).\n",
);

pub const CERTIFICATIONS_INSTRUCTIONS: &str = concat!(
    "From the given resume, extract the following sections exactly as they appear:\n",
    "- Certifications\n- Awards\n- Achievements\n",
    "✅ For each item, include (if mentioned):\n",
    "Certification/Award/Achievement Name (that's it)\n",
    "✅ Preserve the original wording and formatting from the resume.\n",
    "❌ Do not rephrase, infer, or generate any content.\n",
    "❌ No personal responses\n",
    "❌ Only extract from given labeled sections like 'Certifications', 'Achievements', 'Awards', or similar.\n",
);

pub const COMPARISON_INSTRUCTIONS: &str = concat!(
    "Based on this resume and job requirements mentioned in the question: '{question}'\n",
    "Please compare the candidate's skills with the job requirements and provide:\n",
    "1. Matching skills\n2. Missing skills\n3. Overall fit assessment\n4. Recommendations\n\n",
);

pub const STATISTICS_INSTRUCTIONS: &str = concat!(
    "Analyze the following resume and provide a detailed overview report containing only the following items:\n",
    "Total Years of Experience (based on the Work Experience section)\n",
    "Number of Jobs/Positions Held\n",
    "Total Number of Unique Skills Mentioned (only from explicitly listed skills sections)\n",
    "Highest Education Level (Degree name, Institution, Graduation Year)\n",
    "Key Highlights (Notable projects, certifications, achievements—based only on actual content)\n",
    "Resume Quality Assessment:\n",
    "- Clarity & structure\n- Professional tone\n- Relevance of content\n",
    "- Visual formatting (if applicable)\n- Suggestions for improvement (if any)\n",
    "✅ Base everything strictly on the content present in the resume.\n",
    "❌ Do not make assumptions or generate content not mentioned.\n",
    "❌ No hallucinations, fluff, or generic advice.\n\n",
);

pub const GENERAL_INSTRUCTIONS: &str = concat!(
    "Based on the following resume, answer the question below using only the information ",
    "mentioned in the resume.\n",
    "Question: {question}\n",
    "✅ Refer strictly to resume content — do not infer or generate anything not clearly stated.\n",
    "✅ If the answer is not found in the resume, respond with: \"Not mentioned in the resume.\"\n",
    "❌ No assumptions, summaries, or external knowledge.\n\n",
);

fn instructions(category: Category) -> &'static str {
    match category {
        Category::Skills => SKILLS_INSTRUCTIONS,
        Category::Summary => SUMMARY_INSTRUCTIONS,
        Category::Experience => EXPERIENCE_INSTRUCTIONS,
        Category::TechStack => TECH_STACK_INSTRUCTIONS,
        Category::Education => EDUCATION_INSTRUCTIONS,
        Category::Contact => CONTACT_INSTRUCTIONS,
        Category::Projects => PROJECTS_INSTRUCTIONS,
        Category::Certifications => CERTIFICATIONS_INSTRUCTIONS,
        Category::SkillsComparison => COMPARISON_INSTRUCTIONS,
        Category::Statistics => STATISTICS_INSTRUCTIONS,
        Category::General => GENERAL_INSTRUCTIONS,
    }
}

/// Renders the full prompt for `category`. Deterministic for the same inputs.
pub fn build_prompt(category: Category, resume_text: &str, utterance: &str) -> String {
    let mut prompt = if category.uses_utterance() {
        instructions(category).replace(QUESTION_PLACEHOLDER, utterance)
    } else {
        instructions(category).to_string()
    };

    prompt.push_str("Resume text:\n");
    prompt.push_str(resume_text);

    if category == Category::Contact {
        prompt.push_str(CONTACT_TRAILER);
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Jane Doe\nSkills: Rust, Go\nExperience: Acme 2020-2024";

    const ALL: &[Category] = &[
        Category::Skills,
        Category::Summary,
        Category::Experience,
        Category::TechStack,
        Category::Education,
        Category::Contact,
        Category::Projects,
        Category::Certifications,
        Category::SkillsComparison,
        Category::Statistics,
        Category::General,
    ];

    #[test]
    fn test_every_prompt_embeds_resume_verbatim() {
        for &category in ALL {
            let prompt = build_prompt(category, RESUME, "needs Kubernetes");
            assert!(
                prompt.contains(&format!("Resume text:\n{RESUME}")),
                "{category:?} prompt is missing the resume text"
            );
            assert!(!prompt.contains(QUESTION_PLACEHOLDER));
        }
    }

    #[test]
    fn test_skills_prompt_exact() {
        let prompt = build_prompt(Category::Skills, "Skills: Rust", "ignored");
        assert_eq!(
            prompt,
            "From the given resume, extract all skills exactly as written.\n\n\
             ✅ If the resume already categorizes skills (e.g., Technical Skills, Soft Skills, Tools, etc.), \
             retain the same categories and formatting.\n\
             ✅ If no categorization is present, then organize the extracted skills into two groups: \
             Technical Skills and Soft Skills.\n\
             ❌ Do not assume, interpret, or add any skills not explicitly mentioned.\n\
             ❌ Only include content from the Skills section(s) of the resume. \
             Ignore skills implied elsewhere (e.g., in projects or experience).\n\n\
             Resume text:\nSkills: Rust"
        );
    }

    #[test]
    fn test_education_prompt_exact() {
        let prompt = build_prompt(Category::Education, "B.Tech, IIT", "");
        assert_eq!(
            prompt,
            "Extract the following educational details from the given resume:\n\
             - Degree name\n- Institution name\n- Graduation year\n- CGPA (if mentioned)\n\
             ⚠️ Only return these four fields.\n\
             Resume text:\nB.Tech, IIT"
        );
    }

    #[test]
    fn test_contact_prompt_ends_with_request() {
        let prompt = build_prompt(Category::Contact, RESUME, "");
        assert!(prompt.ends_with(&format!("{RESUME}\nPlease provide contact information.")));
    }

    #[test]
    fn test_comparison_embeds_utterance_as_requirement() {
        let prompt = build_prompt(
            Category::SkillsComparison,
            RESUME,
            "compare with a backend role needing Go and Kafka",
        );
        assert!(prompt.starts_with(
            "Based on this resume and job requirements mentioned in the question: \
             'compare with a backend role needing Go and Kafka'\n"
        ));
    }

    #[test]
    fn test_non_question_categories_ignore_utterance() {
        let a = build_prompt(Category::Projects, RESUME, "first");
        let b = build_prompt(Category::Projects, RESUME, "second");
        assert_eq!(a, b);
    }

    #[test]
    fn test_general_prompt_asks_the_question() {
        let prompt = build_prompt(Category::General, RESUME, "Does she know Go?");
        assert!(prompt.contains("Question: Does she know Go?\n"));
        assert!(prompt.contains("Not mentioned in the resume."));
    }

    #[test]
    fn test_resume_text_is_not_template_expanded() {
        let prompt = build_prompt(Category::General, "Skills: {question}", "Rust?");
        assert!(prompt.ends_with("Resume text:\nSkills: {question}"));
    }
}
