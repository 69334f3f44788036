//! Tariswap pool operations
//!
//! Every operation fetches what it needs fresh from the ledger. Writes build a
//! fixed instruction sequence against the caller's default account, submit it
//! and wait for the result. Reads fetch a substate and pick fields out of its
//! CBOR state.

use crate::config::TariswapConfig;
use crate::error::{Result, TariswapError};
use crate::ledger::cbor::{self, find_field, CborValue};
use crate::ledger::{Amount, ComponentAddress, ResourceAddress, ResourceSubstate, SubstateId, VaultId};
use crate::transaction::{
    build_transaction_request, AccountTemplate, Arg, SubstateRequirement, TariswapTemplate,
    Transaction, TransactionBuilder, WorkspaceKey,
};
use crate::wallet::{get_substate, submit_and_wait_for_transaction, Account, TransactionOutcome, WalletProvider};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{debug, info};

/// Vault holding each of a pool's resources
pub type PoolVaults = BTreeMap<ResourceAddress, VaultId>;

/// Amount of each resource held by a pool
pub type PoolBalances = BTreeMap<ResourceAddress, Amount>;

/// A pool registered in a pool index component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEntry {
    pub resource_a: ResourceAddress,
    pub resource_b: ResourceAddress,
    pub pool_component: ComponentAddress,
}

/// Result of instantiating a new pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedPool {
    pub outcome: TransactionOutcome,
    /// LP resource minted by the new pool
    pub lp_resource: Option<ResourceAddress>,
    /// The new pool component
    pub component: Option<ComponentAddress>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LpToken {
    pub address: ResourceAddress,
    pub resource: ResourceSubstate,
}

fn parse_json_string<T>(value: &Value, path: &str, expected: &'static str) -> Result<T>
where
    T: FromStr<Err = TariswapError>,
{
    match value {
        Value::String(s) => s.parse(),
        _ => Err(TariswapError::UnexpectedValue {
            path: path.to_string(),
            expected,
        }),
    }
}

/// Client for one Tariswap deployment
pub struct TariswapClient<P> {
    provider: P,
    config: TariswapConfig,
}

impl<P: WalletProvider> TariswapClient<P> {
    pub fn new(provider: P, config: TariswapConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &TariswapConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn template(&self) -> TariswapTemplate {
        TariswapTemplate::new(
            self.config.template_address.clone(),
            self.config.swap_component.clone(),
        )
    }

    async fn submit(
        &self,
        account: &Account,
        transaction: Transaction,
        required_substates: Vec<SubstateRequirement>,
    ) -> Result<TransactionOutcome> {
        let request = build_transaction_request(transaction, account.account_id, required_substates);
        submit_and_wait_for_transaction(&self.provider, &request, &self.config.poll).await
    }

    /// Account and pool component, needed by every pool method call
    fn pool_inputs(&self, account: &Account) -> Vec<SubstateRequirement> {
        vec![
            SubstateRequirement::unversioned(&account.address),
            SubstateRequirement::unversioned(&self.config.swap_component),
        ]
    }

    /// Instantiate a new pool for the configured token pair
    pub async fn create_pool(&self) -> Result<CreatedPool> {
        let account = self.provider.get_account().await?;
        let account_component = AccountTemplate::new(account.address.clone());
        info!(
            "Creating pool {} / {} (fee {})",
            self.config.first_token, self.config.second_token, self.config.swap_fee
        );

        let transaction = TransactionBuilder::new()
            .call_function(
                self.template().new_pool(),
                vec![
                    Arg::from(&self.config.first_token),
                    Arg::from(&self.config.second_token),
                    Arg::from(self.config.swap_fee),
                ],
            )
            .call_method(account_component.pay_fee(), vec![self.config.transaction_fee.into()])
            .build();

        let required = vec![SubstateRequirement::unversioned(&account.address)];
        let outcome = self.submit(&account, transaction, required).await?;

        let mut lp_resource = None;
        let mut component = None;
        if let Some(diff) = outcome.result.as_ref().and_then(|r| r.result.accepted_diff()) {
            for (id, _) in &diff.up_substates {
                match id {
                    SubstateId::Resource(addr) if lp_resource.is_none() => {
                        lp_resource = Some(addr.clone())
                    }
                    SubstateId::Component(addr) if component.is_none() && *addr != account.address => {
                        component = Some(addr.clone())
                    }
                    _ => {}
                }
            }
        }
        info!("New pool: component {:?}, LP resource {:?}", component, lp_resource);

        Ok(CreatedPool {
            outcome,
            lp_resource,
            component,
        })
    }

    /// Deposit both tokens into the pool and keep the minted LP tokens
    pub async fn add_liquidity(&self, amount_a: Amount, amount_b: Amount) -> Result<TransactionOutcome> {
        let account = self.provider.get_account().await?;
        let account_component = AccountTemplate::new(account.address.clone());
        let tariswap = self.template();
        info!("Adding liquidity: {} / {}", amount_a, amount_b);

        let transaction = TransactionBuilder::new()
            .call_method(
                account_component.withdraw(),
                vec![Arg::from(&self.config.first_token), amount_a.into()],
            )
            .put_last_instruction_output_on_workspace(WorkspaceKey::id(0))
            .call_method(
                account_component.withdraw(),
                vec![Arg::from(&self.config.second_token), amount_b.into()],
            )
            .put_last_instruction_output_on_workspace(WorkspaceKey::id(1))
            .call_method(
                tariswap.add_liquidity(),
                vec![WorkspaceKey::id(0).into(), WorkspaceKey::id(1).into()],
            )
            .put_last_instruction_output_on_workspace(WorkspaceKey::id(2))
            .call_method(account_component.deposit(), vec![WorkspaceKey::id(2).into()])
            .call_method(account_component.pay_fee(), vec![self.config.transaction_fee.into()])
            .build();

        self.submit(&account, transaction, self.pool_inputs(&account)).await
    }

    /// Burn LP tokens and take back both pool tokens
    pub async fn remove_liquidity(&self, amount_lp: Amount) -> Result<TransactionOutcome> {
        let account = self.provider.get_account().await?;
        let account_component = AccountTemplate::new(account.address.clone());
        let tariswap = self.template();
        info!("Removing liquidity: {} LP", amount_lp);

        // remove_liquidity returns a (bucket_a, bucket_b) tuple
        let transaction = TransactionBuilder::new()
            .call_method(
                account_component.withdraw(),
                vec![Arg::from(&self.config.lp_token), amount_lp.into()],
            )
            .put_last_instruction_output_on_workspace(WorkspaceKey::id(0))
            .call_method(tariswap.remove_liquidity(), vec![WorkspaceKey::id(0).into()])
            .put_last_instruction_output_on_workspace(WorkspaceKey::id(1))
            .call_method(account_component.deposit(), vec![WorkspaceKey::field(1, 0).into()])
            .call_method(account_component.deposit(), vec![WorkspaceKey::field(1, 1).into()])
            .call_method(account_component.pay_fee(), vec![self.config.transaction_fee.into()])
            .build();

        self.submit(&account, transaction, self.pool_inputs(&account)).await
    }

    /// Swap `amount` of `input_token` for `output_token`
    pub async fn swap(
        &self,
        input_token: &ResourceAddress,
        amount: Amount,
        output_token: &ResourceAddress,
    ) -> Result<TransactionOutcome> {
        let account = self.provider.get_account().await?;
        let account_component = AccountTemplate::new(account.address.clone());
        let tariswap = self.template();
        info!("Swapping {} of {} for {}", amount, input_token, output_token);

        let transaction = TransactionBuilder::new()
            .call_method(account_component.withdraw(), vec![Arg::from(input_token), amount.into()])
            .put_last_instruction_output_on_workspace(WorkspaceKey::id(0))
            .call_method(
                tariswap.swap(),
                vec![WorkspaceKey::id(0).into(), Arg::from(output_token)],
            )
            .put_last_instruction_output_on_workspace(WorkspaceKey::id(1))
            .call_method(account_component.deposit(), vec![WorkspaceKey::id(1).into()])
            .call_method(account_component.pay_fee(), vec![self.config.transaction_fee.into()])
            .build();

        self.submit(&account, transaction, self.pool_inputs(&account)).await
    }

    async fn component_state(&self, component: &ComponentAddress) -> Result<CborValue> {
        let substate = get_substate(&self.provider, &component.to_string()).await?;
        Ok(substate.component_state()?.clone())
    }

    /// List the pools registered in a pool index component
    pub async fn list_pools(&self, pool_index_component: &ComponentAddress) -> Result<Vec<PoolEntry>> {
        let state = self.component_state(pool_index_component).await?;
        let path = "$.pools";

        let pools = state
            .as_map()
            .and_then(|fields| find_field(fields, "pools"))
            .ok_or_else(|| TariswapError::PathNotFound {
                path: path.to_string(),
            })?
            .as_map()
            .ok_or_else(|| TariswapError::UnexpectedValue {
                path: path.to_string(),
                expected: "a map",
            })?;

        let mut entries = Vec::with_capacity(pools.len());
        for (key, value) in pools {
            let pair = match key.as_array() {
                Some([a, b]) => (cbor::convert(a), cbor::convert(b)),
                _ => {
                    return Err(TariswapError::UnexpectedValue {
                        path: path.to_string(),
                        expected: "a resource pair key",
                    })
                }
            };
            entries.push(PoolEntry {
                resource_a: parse_json_string(&pair.0, path, "a resource address")?,
                resource_b: parse_json_string(&pair.1, path, "a resource address")?,
                pool_component: parse_json_string(&cbor::convert(value), path, "a component address")?,
            });
        }

        debug!("Pool index {} lists {} pools", pool_index_component, entries.len());
        Ok(entries)
    }

    /// LP resource of the configured pool
    pub async fn get_pool_liquidity_resource(&self) -> Result<ResourceAddress> {
        let state = self.component_state(&self.config.swap_component).await?;
        let path = "$.lp_resource";
        let value = cbor::get_value_by_path(&state, path)?;
        parse_json_string(&value, path, "a resource address")
    }

    /// Vaults of the configured pool, keyed by resource
    pub async fn get_pool_vaults(&self) -> Result<PoolVaults> {
        let state = self.component_state(&self.config.swap_component).await?;
        let path = "$.pools";
        let value = cbor::get_value_by_path(&state, path)?;
        let object = value.as_object().ok_or_else(|| TariswapError::UnexpectedValue {
            path: path.to_string(),
            expected: "a map",
        })?;

        let mut vaults = PoolVaults::new();
        for (resource, vault) in object {
            vaults.insert(resource.parse()?, parse_json_string(vault, path, "a vault id")?);
        }
        Ok(vaults)
    }

    /// Fungible balance held in each of the pool's vaults
    pub async fn get_pool_balances(&self) -> Result<PoolBalances> {
        let vaults = self.get_pool_vaults().await?;
        self.balances_for(&vaults).await
    }

    /// Fungible balance of each vault in an already fetched vault map
    pub async fn balances_for(&self, vaults: &PoolVaults) -> Result<PoolBalances> {
        let mut balances = PoolBalances::new();

        for (resource, vault) in vaults {
            let substate = get_substate(&self.provider, &vault.to_string()).await?;
            let amount = substate
                .as_vault()?
                .resource_container
                .fungible_amount()
                .ok_or_else(|| TariswapError::UnexpectedSubstate {
                    id: vault.to_string(),
                    expected: "fungible vault",
                })?;
            debug!("Vault {} holds {} of {}", vault, amount, resource);
            balances.insert(resource.clone(), amount);
        }

        Ok(balances)
    }

    /// Resource substate of the pool's LP token
    pub async fn get_pool_lp_token(&self) -> Result<LpToken> {
        let address = self.get_pool_liquidity_resource().await?;
        let substate = get_substate(&self.provider, &address.to_string()).await?;
        Ok(LpToken {
            resource: substate.as_resource()?.clone(),
            address,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::cbor::BinaryTag;
    use crate::ledger::substate::{
        ComponentBody, ComponentHeader, ResourceContainer, Substate, SubstateValue, VaultSubstate,
    };
    use crate::wallet::testing::{RecordingProvider, TEST_ACCOUNT};
    use serde_json::json;

    const INDEX: &str = "component_1d1d";

    fn text(s: &str) -> CborValue {
        CborValue::Text(s.to_string())
    }

    fn tagged(tag: BinaryTag, hex_body: &str) -> CborValue {
        CborValue::Tag(tag as u64, Box::new(CborValue::Bytes(hex::decode(hex_body).unwrap())))
    }

    fn component(state: CborValue) -> SubstateValue {
        SubstateValue::Component(ComponentHeader {
            template_address: None,
            module_name: Some("TariSwapPool".to_string()),
            body: ComponentBody { state },
        })
    }

    fn fungible_vault(resource: &str, amount: i64) -> SubstateValue {
        SubstateValue::Vault(VaultSubstate {
            resource_container: ResourceContainer::Fungible {
                address: resource.parse().unwrap(),
                amount: Amount(amount),
                locked_amount: Amount(0),
            },
        })
    }

    fn client_with_pool() -> TariswapClient<RecordingProvider> {
        let provider = RecordingProvider::new();
        let config = TariswapConfig {
            poll: crate::config::PollConfig {
                interval_ms: 1,
                max_attempts: Some(5),
            },
            ..Default::default()
        };
        let state = CborValue::Map(vec![
            (
                text("pools"),
                CborValue::Map(vec![
                    (tagged(BinaryTag::ResourceAddress, "aa01"), tagged(BinaryTag::VaultId, "0a01")),
                    (tagged(BinaryTag::ResourceAddress, "bb02"), tagged(BinaryTag::VaultId, "0b02")),
                ]),
            ),
            (text("lp_resource"), tagged(BinaryTag::ResourceAddress, "cc03")),
            (text("fee"), CborValue::Integer(50)),
        ]);
        provider.insert_substate(&config.swap_component.to_string(), component(state));
        provider.insert_substate("vault_0a01", fungible_vault("resource_aa01", 1_000));
        provider.insert_substate("vault_0b02", fungible_vault("resource_bb02", 4_000));
        TariswapClient::new(provider, config)
    }

    fn submitted_instructions(client: &TariswapClient<RecordingProvider>) -> Value {
        let submitted = client.provider().submitted();
        assert_eq!(submitted.len(), 1);
        serde_json::to_value(&submitted[0].instructions).unwrap()
    }

    #[tokio::test]
    async fn test_add_liquidity_sequence() {
        let client = client_with_pool();
        let outcome = client.add_liquidity(Amount(100), Amount(200)).await.unwrap();
        assert_eq!(outcome.transaction_id, "tx_1");

        let cfg = client.config();
        let pool = cfg.swap_component.to_string();
        assert_eq!(
            submitted_instructions(&client),
            json!([
                {"CallMethod": {"component_address": TEST_ACCOUNT, "method": "withdraw",
                    "args": [cfg.first_token.to_string(), 100]}},
                {"PutLastInstructionOutputOnWorkspace": {"key": [0]}},
                {"CallMethod": {"component_address": TEST_ACCOUNT, "method": "withdraw",
                    "args": [cfg.second_token.to_string(), 200]}},
                {"PutLastInstructionOutputOnWorkspace": {"key": [1]}},
                {"CallMethod": {"component_address": pool, "method": "add_liquidity",
                    "args": [{"Workspace": [0]}, {"Workspace": [1]}]}},
                {"PutLastInstructionOutputOnWorkspace": {"key": [2]}},
                {"CallMethod": {"component_address": TEST_ACCOUNT, "method": "deposit",
                    "args": [{"Workspace": [2]}]}},
                {"CallMethod": {"component_address": TEST_ACCOUNT, "method": "pay_fee",
                    "args": [2000]}}
            ])
        );

        let request = &client.provider().submitted()[0];
        assert_eq!(request.signing_key_index, Some(3));
        let inputs: Vec<&str> = request.inputs.iter().map(|r| r.substate_id.as_str()).collect();
        assert_eq!(inputs, vec![TEST_ACCOUNT, pool.as_str()]);
    }

    #[tokio::test]
    async fn test_remove_liquidity_deposits_both_tuple_fields() {
        let client = client_with_pool();
        client.remove_liquidity(Amount(75)).await.unwrap();

        let instructions = submitted_instructions(&client);
        assert_eq!(
            instructions[0],
            json!({"CallMethod": {"component_address": TEST_ACCOUNT, "method": "withdraw",
                "args": [client.config().lp_token.to_string(), 75]}})
        );
        assert_eq!(instructions[2]["CallMethod"]["method"], json!("remove_liquidity"));
        assert_eq!(
            instructions[4]["CallMethod"]["args"],
            json!([{"Workspace": [1, 46, 48]}])
        );
        assert_eq!(
            instructions[5]["CallMethod"]["args"],
            json!([{"Workspace": [1, 46, 49]}])
        );
        assert_eq!(instructions[6]["CallMethod"]["method"], json!("pay_fee"));
    }

    #[tokio::test]
    async fn test_swap_sequence() {
        let client = client_with_pool();
        let input: ResourceAddress = "resource_aa01".parse().unwrap();
        let output: ResourceAddress = "resource_bb02".parse().unwrap();
        client.swap(&input, Amount(10), &output).await.unwrap();

        let instructions = submitted_instructions(&client);
        assert_eq!(instructions.as_array().unwrap().len(), 6);
        assert_eq!(instructions[0]["CallMethod"]["args"], json!(["resource_aa01", 10]));
        assert_eq!(
            instructions[2],
            json!({"CallMethod": {
                "component_address": client.config().swap_component.to_string(),
                "method": "swap",
                "args": [{"Workspace": [0]}, "resource_bb02"]
            }})
        );
        assert_eq!(instructions[4]["CallMethod"]["args"], json!([{"Workspace": [1]}]));
    }

    #[tokio::test]
    async fn test_create_pool_reads_new_substates() {
        let client = client_with_pool();
        let resource = Substate {
            substate: SubstateValue::Resource(ResourceSubstate {
                resource_type: "Fungible".to_string(),
                total_supply: None,
                metadata: Value::Null,
                owner_key: None,
            }),
            version: 0,
        };
        let account_component = Substate {
            substate: component(CborValue::Null),
            version: 1,
        };
        let pool_component = account_component.clone();
        client.provider().push_accept(vec![
            (SubstateId::Component(TEST_ACCOUNT.parse().unwrap()), account_component),
            (SubstateId::Resource("resource_dd04".parse().unwrap()), resource),
            (SubstateId::Component("component_ee05".parse().unwrap()), pool_component),
        ]);

        let created = client.create_pool().await.unwrap();
        assert_eq!(created.lp_resource.unwrap().to_string(), "resource_dd04");
        assert_eq!(created.component.unwrap().to_string(), "component_ee05");

        let instructions = submitted_instructions(&client);
        assert_eq!(
            instructions[0],
            json!({"CallFunction": {
                "template_address": client.config().template_address.to_string(),
                "function": "new",
                "args": [
                    client.config().first_token.to_string(),
                    client.config().second_token.to_string(),
                    50
                ]
            }})
        );
        let request = &client.provider().submitted()[0];
        assert_eq!(request.inputs.len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_swap_propagates() {
        let client = client_with_pool();
        client.provider().push_reject("slippage");
        let token: ResourceAddress = "resource_aa01".parse().unwrap();
        let out: ResourceAddress = "resource_bb02".parse().unwrap();
        let err = client.swap(&token, Amount(1), &out).await.unwrap_err();
        assert!(matches!(err, TariswapError::TransactionRejected { .. }));
    }

    #[tokio::test]
    async fn test_pool_vaults_and_balances() {
        let client = client_with_pool();

        let vaults = client.get_pool_vaults().await.unwrap();
        assert_eq!(vaults.len(), 2);
        assert_eq!(
            vaults[&"resource_aa01".parse::<ResourceAddress>().unwrap()].to_string(),
            "vault_0a01"
        );

        let balances = client.get_pool_balances().await.unwrap();
        assert_eq!(balances[&"resource_aa01".parse::<ResourceAddress>().unwrap()], Amount(1_000));
        assert_eq!(balances[&"resource_bb02".parse::<ResourceAddress>().unwrap()], Amount(4_000));
    }

    #[tokio::test]
    async fn test_balances_for_reads_only_given_vaults() {
        let client = client_with_pool();
        let resource: ResourceAddress = "resource_bb02".parse().unwrap();
        let vaults: PoolVaults = [(resource.clone(), "vault_0b02".parse::<VaultId>().unwrap())]
            .into_iter()
            .collect();

        let balances = client.balances_for(&vaults).await.unwrap();
        assert_eq!(balances.len(), 1);
        assert_eq!(balances[&resource], Amount(4_000));
        assert_eq!(client.provider().substate_reads(), vec!["vault_0b02".to_string()]);
    }

    #[tokio::test]
    async fn test_balances_reject_non_fungible_vault() {
        let client = client_with_pool();
        client.provider().insert_substate(
            "vault_0b02",
            SubstateValue::Vault(VaultSubstate {
                resource_container: ResourceContainer::NonFungible {
                    address: "resource_bb02".parse().unwrap(),
                    token_ids: Vec::new(),
                },
            }),
        );
        let err = client.get_pool_balances().await.unwrap_err();
        assert!(matches!(
            err,
            TariswapError::UnexpectedSubstate { expected: "fungible vault", .. }
        ));
    }

    #[tokio::test]
    async fn test_lp_token() {
        let client = client_with_pool();
        assert_eq!(
            client.get_pool_liquidity_resource().await.unwrap().to_string(),
            "resource_cc03"
        );

        client.provider().insert_substate(
            "resource_cc03",
            SubstateValue::Resource(ResourceSubstate {
                resource_type: "Fungible".to_string(),
                total_supply: Some(Amount(500)),
                metadata: json!({"token_symbol": "LP"}),
                owner_key: None,
            }),
        );
        let token = client.get_pool_lp_token().await.unwrap();
        assert_eq!(token.address.to_string(), "resource_cc03");
        assert_eq!(token.resource.total_supply, Some(Amount(500)));
        assert_eq!(token.resource.token_symbol(), Some("LP"));
        assert_eq!(client.provider().substate_reads().last().unwrap(), "resource_cc03");
    }

    #[tokio::test]
    async fn test_list_pools_from_index() {
        let client = client_with_pool();
        let index_state = CborValue::Map(vec![(
            text("pools"),
            CborValue::Map(vec![(
                CborValue::Array(vec![
                    tagged(BinaryTag::ResourceAddress, "aa01"),
                    tagged(BinaryTag::ResourceAddress, "bb02"),
                ]),
                tagged(BinaryTag::ComponentAddress, "ff06"),
            )]),
        )]);
        client.provider().insert_substate(INDEX, component(index_state));

        let pools = client.list_pools(&INDEX.parse().unwrap()).await.unwrap();
        assert_eq!(
            pools,
            vec![PoolEntry {
                resource_a: "resource_aa01".parse().unwrap(),
                resource_b: "resource_bb02".parse().unwrap(),
                pool_component: "component_ff06".parse().unwrap(),
            }]
        );
    }

    #[tokio::test]
    async fn test_list_pools_without_pools_field() {
        let client = client_with_pool();
        client
            .provider()
            .insert_substate(INDEX, component(CborValue::Map(Vec::new())));
        let err = client.list_pools(&INDEX.parse().unwrap()).await.unwrap_err();
        assert!(matches!(err, TariswapError::PathNotFound { .. }));
    }

    #[tokio::test]
    async fn test_unknown_index_component_is_rpc_error() {
        let client = client_with_pool();
        let err = client
            .list_pools(&"component_0a01".parse().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, TariswapError::Rpc { code: 404, .. }));
    }
}
