use anyhow::Result;

/// Narrow text-completion capability: prompt and output budget in, text out.
///
/// Any `Fn(&str, usize) -> Result<String>` closure qualifies, which keeps
/// test doubles and thin provider adapters to a single expression.
pub trait LlmClient: Send + Sync {
    fn complete(&self, prompt: &str, max_tokens: usize) -> Result<String>;
}

impl<F> LlmClient for F
where
    F: Fn(&str, usize) -> Result<String> + Send + Sync,
{
    fn complete(&self, prompt: &str, max_tokens: usize) -> Result<String> {
        self(prompt, max_tokens)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::bail;

    use super::LlmClient;

    #[test]
    fn closures_act_as_clients() {
        let echo = |prompt: &str, max_tokens: usize| -> anyhow::Result<String> {
            Ok(format!("{max_tokens}:{prompt}"))
        };
        let client: &dyn LlmClient = &echo;

        assert_eq!(client.complete("hello", 16).expect("echo succeeds"), "16:hello");
    }

    #[test]
    fn failures_propagate_to_caller() {
        let offline =
            |_prompt: &str, _max_tokens: usize| -> anyhow::Result<String> { bail!("offline") };

        let error = offline.complete("hello", 16).expect_err("offline client fails");
        assert_eq!(error.to_string(), "offline");
    }
}
