//! System prompts and user-message templates.

/// Analyst framing for evaluator and grounded chat calls.
pub const ANALYST_SYSTEM: &str = "You are an expert construction project analyst. Answer clearly.";

pub const FORECASTER_SYSTEM: &str =
    "You are a risk forecaster. Identify possible delays or risks in project milestones and estimate impacts.";

pub const AGENT_SYSTEM: &str = "You are an agent that should use available tools and project context to perform multi-step reasoning. Be explicit about steps and final answer.";

/// `Context:\n{context}\n\nQuestion:\n{query}`
pub fn context_question(context: &str, query: &str) -> String {
    format!("Context:\n{context}\n\nQuestion:\n{query}")
}

/// `Project context:\n{snippet}\n\nUser question:\n{prompt}`
pub fn grounded_question(snippet: &str, prompt: &str) -> String {
    format!("Project context:\n{snippet}\n\nUser question:\n{prompt}")
}

pub fn agent_task(task: &str, tool_desc: &str) -> String {
    format!(
        "You are an agent with tools. Task: {task}\n\nTool outputs:\n{tool_desc}\n\n\
         Please plan steps, use the tool outputs where relevant, and give a final concise answer."
    )
}

/// System prompt that restricts the answer to the retrieved document text.
pub fn document_system(context: &str) -> String {
    format!(
        "You are a helpful assistant. Answer the question using ONLY the context below.\n\n\
         Context:\n{context}\n\n\
         If the answer is not in the context, say 'I don\u{2019}t know based on the document.'"
    )
}

/// Criterion every eval answer is graded on.
pub const EVAL_CRITERION: &str = "correctness";

pub fn judge(criterion: &str, input: &str, output: &str) -> String {
    format!(
        "You are an evaluator. Evaluate the model output below for {criterion}.\n\
         Input: {input}\n\
         Output: {output}\n\
         Respond with a score (0-1) or a short comment."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_render() {
        assert_eq!(context_question("a\nb", "q?"), "Context:\na\nb\n\nQuestion:\nq?");
        assert_eq!(grounded_question("s", "p"), "Project context:\ns\n\nUser question:\np");
        assert!(agent_task("t", "No tools used.").starts_with("You are an agent with tools. Task: t\n\nTool outputs:\nNo tools used.\n\nPlease plan"));
        assert!(document_system("ctx").contains("Context:\nctx\n\nIf the answer"));
        assert_eq!(
            judge("correctness", "2+2?", "4"),
            "You are an evaluator. Evaluate the model output below for correctness.\nInput: 2+2?\nOutput: 4\nRespond with a score (0-1) or a short comment."
        );
    }
}
