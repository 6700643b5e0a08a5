//! Static agent table.
//!
//! Agents are compiled in rather than discovered at runtime; the set is
//! small and the prompts are part of the program, so a plugin scan buys
//! nothing but failure modes.

/// One registered agent: identity, display metadata, and its base prompt.
pub struct AgentSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    /// Planning agents derive a `specs/` slug for their output file.
    pub planning: bool,
    /// Category word removed from the slug derivation.
    pub category: &'static str,
    base_prompt: &'static str,
}

impl AgentSpec {
    /// Full system prompt: the base prompt plus the per-agent project
    /// context, when configured.
    pub fn system_prompt(
        &self,
        context_folder: Option<&str>,
        focus_file: Option<&str>,
    ) -> String {
        let mut prompt = self.base_prompt.to_string();
        if context_folder.is_some() || focus_file.is_some() {
            prompt.push_str("\n\nPROJECT CONTEXT:\n");
            if let Some(folder) = context_folder {
                prompt.push_str(&format!("Project folder: {folder}\n"));
            }
            if let Some(file) = focus_file {
                prompt.push_str(&format!("Focus file: {file}\n"));
            }
            prompt.push_str("Consider this project context in your response.");
        }
        prompt
    }
}

static AGENTS: &[AgentSpec] = &[
    AgentSpec {
        id: "prompt-assistant",
        name: "Prompt Assistant",
        description: "Expands and refines prompts with better structure",
        icon: "🔧",
        planning: false,
        category: "prompt",
        base_prompt: "You are an expert at crafting clear, well-structured prompts for AI \
interactions.\n\nTransform the user's input into a polished, professional prompt that has \
clear context, states requirements precisely, and uses appropriate formatting.\n\n\
IMPORTANT:\n- Return ONLY the refined prompt, no explanations\n- Make it actionable and \
specific\n- Add relevant technical context when appropriate",
    },
    AgentSpec {
        id: "implementer",
        name: "Implementation Agent",
        description: "Implements code changes in project files",
        icon: "💻",
        planning: false,
        category: "implementation",
        base_prompt: "You are an expert software developer.\n\nImplement the requested \
changes: follow existing project conventions, make precise changes to existing files, and \
provide complete content for new files with their paths stated clearly.\n\nIMPORTANT:\n\
- Return ONLY the implementation details, no meta-commentary\n- Include imports and \
dependencies if needed\n- Ensure code is production-ready",
    },
    AgentSpec {
        id: "tester",
        name: "Testing Assistant",
        description: "Generates test cases and testing strategies",
        icon: "🧪",
        planning: false,
        category: "test",
        base_prompt: "You are an expert QA engineer.\n\nAnalyze the given code, feature, or \
requirements and produce a test strategy with detailed test cases: description, \
preconditions, steps, expected results, and edge cases.\n\nIMPORTANT:\n- Return ONLY the \
test plan and test cases\n- Cover positive and negative scenarios and boundary conditions\n\
- Use clear markdown formatting",
    },
    AgentSpec {
        id: "diagnostics",
        name: "Diagnostics Agent",
        description: "Analyzes errors, logs, and stack traces",
        icon: "🩺",
        planning: false,
        category: "diagnostic",
        base_prompt: "You are an expert at diagnosing software failures.\n\nGiven an error \
message, log excerpt, or stack trace, identify the most likely root cause, explain the \
failure mechanism briefly, and propose a concrete fix.\n\nIMPORTANT:\n- Lead with the root \
cause\n- Keep the explanation short and specific\n- Show the fix as code when applicable",
    },
    AgentSpec {
        id: "feature-planner",
        name: "Feature Planner",
        description: "Generates implementation plans with testing strategy and acceptance criteria",
        icon: "✨",
        planning: true,
        category: "feature",
        base_prompt: "You are a planning agent that creates detailed implementation plans \
for new features.\n\nProduce a markdown plan with: feature description, user story, problem \
and solution statements, relevant files, phased implementation steps, testing strategy, and \
measurable acceptance criteria.\n\nIMPORTANT:\n- Return ONLY the markdown plan, no \
conversational text\n- Replace every placeholder with actual values\n- The output is saved \
directly to specs/*.md, so it must be complete and ready to use",
    },
    AgentSpec {
        id: "bug-planner",
        name: "Bug Planner",
        description: "Creates bug fix plans with root cause analysis and reproduction steps",
        icon: "🐛",
        planning: true,
        category: "bug",
        base_prompt: "You are a planning agent that creates detailed bug fix plans.\n\n\
Read the project first, then produce a markdown plan with: bug description with symptoms, \
problem and solution statements, step-by-step reproduction, root cause analysis, relevant \
files, surgical fix tasks, and validation commands.\n\nIMPORTANT:\n- Fix the root cause \
with minimal changes, no unrelated refactoring\n- Return ONLY the markdown plan, no \
conversational text\n- The output is saved directly to specs/*.md, so it must be complete \
and ready to use",
    },
    AgentSpec {
        id: "chore-planner",
        name: "Chore Planner",
        description: "Generates chore implementation plans with structured tasks and validation",
        icon: "📋",
        planning: true,
        category: "chore",
        base_prompt: "You are a planning agent that creates detailed implementation plans \
for maintenance chores.\n\nProduce a markdown plan with: chore description, relevant \
files, ordered step-by-step tasks, and validation commands proving the chore is done with \
zero regressions.\n\nIMPORTANT:\n- Keep the scope tight; a chore is routine maintenance, \
not a feature\n- Return ONLY the markdown plan, no conversational text\n- The output is \
saved directly to specs/*.md, so it must be complete and ready to use",
    },
];

/// Round-robin cursor over the static agent table.
pub struct AgentRegistry {
    index: usize,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self { index: 0 }
    }

    pub fn current(&self) -> &'static AgentSpec {
        &AGENTS[self.index]
    }

    /// Advance to the next agent, wrapping at the end of the table.
    pub fn next(&mut self) -> &'static AgentSpec {
        self.index = (self.index + 1) % AGENTS.len();
        let agent = self.current();
        tracing::info!("switched to agent: {}", agent.name);
        agent
    }

    pub fn by_name(name: &str) -> Option<&'static AgentSpec> {
        AGENTS.iter().find(|a| a.name == name)
    }

    pub fn all() -> &'static [AgentSpec] {
        AGENTS
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
