//! Fluent builder for instruction sequences

use crate::transaction::instruction::{Arg, Instruction, WorkspaceKey};
use crate::transaction::template::{TemplateFunction, TemplateMethod};
use serde::Serialize;

/// An unsigned list of instructions ready to be wrapped into a request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Transaction {
    pub instructions: Vec<Instruction>,
}

#[derive(Debug, Default)]
pub struct TransactionBuilder {
    instructions: Vec<Instruction>,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_function(mut self, function: TemplateFunction, args: Vec<Arg>) -> Self {
        self.instructions.push(Instruction::CallFunction {
            template_address: function.template_address,
            function: function.function.to_string(),
            args,
        });
        self
    }

    pub fn call_method(mut self, method: TemplateMethod, args: Vec<Arg>) -> Self {
        self.instructions.push(Instruction::CallMethod {
            component_address: method.component_address,
            method: method.method.to_string(),
            args,
        });
        self
    }

    pub fn put_last_instruction_output_on_workspace(mut self, key: WorkspaceKey) -> Self {
        self.instructions
            .push(Instruction::PutLastInstructionOutputOnWorkspace { key });
        self
    }

    pub fn build(self) -> Transaction {
        Transaction {
            instructions: self.instructions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Amount, ComponentAddress, ResourceAddress};
    use crate::transaction::template::AccountTemplate;
    use serde_json::json;

    #[test]
    fn test_builder_keeps_order() {
        let account = AccountTemplate::new("component_01".parse::<ComponentAddress>().unwrap());
        let resource: ResourceAddress = "resource_aa".parse().unwrap();

        let tx = TransactionBuilder::new()
            .call_method(account.withdraw(), vec![Arg::from(&resource), Arg::from(Amount(10))])
            .put_last_instruction_output_on_workspace(WorkspaceKey::id(0))
            .call_method(account.deposit(), vec![WorkspaceKey::id(0).into()])
            .call_method(account.pay_fee(), vec![Amount(2000).into()])
            .build();

        assert_eq!(tx.instructions.len(), 4);
        assert_eq!(
            serde_json::to_value(&tx.instructions[2]).unwrap(),
            json!({"CallMethod": {
                "component_address": "component_01",
                "method": "deposit",
                "args": [{"Workspace": [0]}]
            }})
        );
    }
}
