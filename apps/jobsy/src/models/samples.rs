// Built-in sample artifacts used when the profile has nothing stored yet.

pub const SAMPLE_RESUME: &str = "Jane Doe
(555) 987-6543 | jane.doe@email.com | LinkedIn/jane-doe-pm

Summary
Highly experienced Product Manager with 8 years in the SaaS industry, specializing in B2B platform development. Expert in Agile methodologies, user story mapping, and cross-functional team leadership. Successfully launched two major products that generated over $15M in ARR within the first year.

Experience
Senior Product Manager | Growth Solutions SaaS | 2019 – Present
- Defined product strategy and roadmap for a complex analytics dashboard used by 500+ enterprise clients.
- Led a team of designers, engineers, and marketers from concept to launch.
- Increased user engagement by 40% through iterative feature releases and A/B testing.

Product Manager | E-Commerce Innovations | 2017 – 2019
- Managed the lifecycle of the mobile application, leading to a 30% rise in mobile transactions.

Education
MBA, Technology Management | Stanford University
B.S. in Economics | UC Berkeley";

pub const SAMPLE_JOB_DESC: &str = "Job Title: Principal Product Manager, AI Solutions
Company: FutureTech Global

We seek a Principal Product Manager to drive the strategy and execution of our next-generation AI-powered B2B platform. This role requires deep technical acumen and exceptional leadership skills.

Responsibilities:
- Own the end-to-end product lifecycle for machine learning features.
- Define market requirements, competitive analysis, and success metrics (KPIs).
- Collaborate closely with AI/ML engineering teams and data scientists.

Requirements:
- 7+ years of product management experience, preferably in AI/ML.
- Strong knowledge of data science workflows and model deployment.
- MBA or advanced technical degree preferred.";
