//! Callable entry points of the templates the pool operations use

use crate::ledger::{ComponentAddress, TemplateAddress};

/// A function published by a template (no component yet)
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateFunction {
    pub template_address: TemplateAddress,
    pub function: &'static str,
}

/// A method on an instantiated component
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateMethod {
    pub component_address: ComponentAddress,
    pub method: &'static str,
}

/// Tariswap pool template and the pool component built from it
#[derive(Debug, Clone)]
pub struct TariswapTemplate {
    template_address: TemplateAddress,
    component_address: ComponentAddress,
}

impl TariswapTemplate {
    pub fn new(template_address: TemplateAddress, component_address: ComponentAddress) -> Self {
        Self {
            template_address,
            component_address,
        }
    }

    /// `new(resource_a, resource_b, fee)` constructor
    pub fn new_pool(&self) -> TemplateFunction {
        TemplateFunction {
            template_address: self.template_address.clone(),
            function: "new",
        }
    }

    pub fn add_liquidity(&self) -> TemplateMethod {
        self.method("add_liquidity")
    }

    pub fn remove_liquidity(&self) -> TemplateMethod {
        self.method("remove_liquidity")
    }

    pub fn swap(&self) -> TemplateMethod {
        self.method("swap")
    }

    fn method(&self, method: &'static str) -> TemplateMethod {
        TemplateMethod {
            component_address: self.component_address.clone(),
            method,
        }
    }
}

/// Built-in account component
#[derive(Debug, Clone)]
pub struct AccountTemplate {
    component_address: ComponentAddress,
}

impl AccountTemplate {
    pub fn new(component_address: ComponentAddress) -> Self {
        Self { component_address }
    }

    pub fn withdraw(&self) -> TemplateMethod {
        self.method("withdraw")
    }

    pub fn deposit(&self) -> TemplateMethod {
        self.method("deposit")
    }

    pub fn pay_fee(&self) -> TemplateMethod {
        self.method("pay_fee")
    }

    fn method(&self, method: &'static str) -> TemplateMethod {
        TemplateMethod {
            component_address: self.component_address.clone(),
            method,
        }
    }
}
