//! Objective that builds, trains and scores one classifier per candidate

use super::epoch_trainer::Trainer;
use crate::error::Result;
use crate::model::ModelFactory;
use crate::optim::hpo::{Candidate, Objective};

/// [`ModelFactory`] plus a [`Trainer`], evaluated as a search objective
pub struct ClassifierObjective<T> {
    factory: ModelFactory,
    trainer: T,
}

impl<T: Trainer> ClassifierObjective<T> {
    pub fn new(factory: ModelFactory, trainer: T) -> Self {
        Self { factory, trainer }
    }

    pub fn factory(&self) -> &ModelFactory {
        &self.factory
    }

    pub fn trainer(&self) -> &T {
        &self.trainer
    }
}

impl<T: Trainer> Objective for ClassifierObjective<T> {
    fn evaluate(&mut self, candidate: &Candidate) -> Result<f64> {
        let classifier = self.factory.build_candidate(candidate)?;
        self.trainer.train_and_score(&classifier)
    }
}
