use evo_genome::{Genotype, Phenotype};

/// Wraps a genotype and its compiled phenotype for the duration of one
/// episode, plus a memory buffer of the agent's own actions in that
/// episode. A `SimulationAgent` is constructed fresh per episode (§4.5),
/// so the buffer never needs clearing; it is not fed back into prompts
/// in the baseline protocol, and exists for post-episode inspection.
#[derive(Debug, Clone)]
pub struct SimulationAgent {
    pub genotype: Genotype,
    pub phenotype: Phenotype,
    memory: Vec<String>,
}

impl SimulationAgent {
    pub fn new(genotype: Genotype, phenotype: Phenotype) -> Self {
        Self {
            genotype,
            phenotype,
            memory: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.genotype.name
    }

    pub(crate) fn record(&mut self, action: impl Into<String>) {
        self.memory.push(action.into());
    }

    pub fn memory(&self) -> &[String] {
        &self.memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evo_genome::compile;

    #[test]
    fn memory_accumulates_recorded_actions_in_order() {
        let genotype = Genotype::new("alice");
        let phenotype = compile(&genotype);
        let mut agent = SimulationAgent::new(genotype, phenotype);

        assert!(agent.memory().is_empty());
        agent.record("posted: hello");
        agent.record("replied to bob: hi");

        assert_eq!(agent.memory(), ["posted: hello", "replied to bob: hi"]);
    }
}
