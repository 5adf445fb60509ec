// All LLM prompt templates for the three AI-backed features.
// Placeholders are filled by llm_client::prompts::fill_template.

/// Resume vs job description analysis. Replace `{resume}` and `{job_description}`.
/// The section order is load-bearing: the renderer turns the first line into the score banner.
pub const MATCH_PROMPT_TEMPLATE: &str = r#"Act as a senior technical recruiter and career coach.
Analyze the provided resume against the job description.

Output requirements (Markdown ONLY), in this exact order:
1. # Match Score: [Score]%
2. ## Top Matching Skills (List 3-5 keywords found in both)
3. ## Missing Requirements (List specific technical skills or experience gaps)
4. ## Optimized Bullet Points (Rewrite 2 points from the resume to better target the Job Description keywords)
5. ## Strategic Advice (A short paragraph on how to land the interview)

--- RESUME ---
{resume}

--- JOB DESCRIPTION ---
{job_description}"#;

/// Twelve-month transition roadmap. Replace `{target_role}`.
pub const ROADMAP_PROMPT_TEMPLATE: &str = r#"Create a comprehensive, 12-month career transition roadmap for becoming a {target_role}.
Break it down into:
- Phase 1: Foundations (Months 1-3)
- Phase 2: Technical Deep Dive (Months 4-7)
- Phase 3: Project Building & Portfolio (Months 8-10)
- Phase 4: Job Market Strategy (Months 11-12)

Include specific tools, certifications, and high-impact projects for each phase.
Use professional Markdown with clear headers and lists.
Search for current industry trends to make it accurate."#;

/// Interview preparation guide. Replace `{role}`.
pub const INTERVIEW_PROMPT_TEMPLATE: &str = r#"Generate a high-intensity interview prep guide for the role of: {role}.
Include:
1. Top 5 Technical Questions (and how to answer them).
2. 3 Behavioral Questions using the STAR method.
3. Industry Trends (Recent news or shifts relevant to this role).
4. Preparation Checklist.

Use professional Markdown formatting."#;
