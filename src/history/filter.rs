use crate::{
    types::{NormalizedTransaction, RawTransactionSummary},
    utils::{felt_eq, same_hash},
};

fn is_deploy(txn: &NormalizedTransaction, deploy_txns: &[RawTransactionSummary]) -> bool {
    deploy_txns
        .iter()
        .any(|deploy| same_hash(&deploy.hash, &txn.txn_hash))
}

/// Trims normalized transactions to the time window and optional contract.
///
/// A transaction is kept when its timestamp is at or after `min_timestamp_ms`
/// and, if `contract_address` is given, its contract address is numerically
/// equal to it. Transactions whose hash is in `deploy_txns` are always kept.
pub fn filter_transactions(
    txns: &[NormalizedTransaction],
    deploy_txns: &[RawTransactionSummary],
    min_timestamp_ms: u64,
    contract_address: Option<&str>,
) -> Vec<NormalizedTransaction> {
    txns.iter()
        .filter(|txn| {
            if is_deploy(txn, deploy_txns) {
                return true;
            }
            let in_window = txn.timestamp.saturating_mul(1000) >= min_timestamp_ms;
            let on_contract = contract_address
                .map_or(true, |address| felt_eq(&txn.contract_address, address));
            in_window && on_contract
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(hash: &str, txn_type: &str, timestamp: u64, contract: &str) -> NormalizedTransaction {
        NormalizedTransaction {
            txn_hash: hash.to_string(),
            txn_type: txn_type.to_string(),
            chain_id: "0x534e5f4d41494e".to_string(),
            sender_address: "0xa".to_string(),
            contract_address: contract.to_string(),
            contract_func_name: String::new(),
            contract_call_data: Vec::new(),
            timestamp,
            finality_status: String::new(),
            execution_status: String::new(),
            event_ids: Vec::new(),
            failure_reason: String::new(),
        }
    }

    fn deploy(hash: &str) -> RawTransactionSummary {
        RawTransactionSummary {
            hash: hash.to_string(),
            txn_type: "DEPLOY_ACCOUNT".to_string(),
            timestamp: 1,
            contract_address: None,
        }
    }

    fn hashes(txns: &[NormalizedTransaction]) -> Vec<&str> {
        txns.iter().map(|txn| txn.txn_hash.as_str()).collect()
    }

    #[test]
    fn keeps_window_and_deploys() {
        let txns = vec![
            txn("0x1", "invoke", 2000, "0xc"),
            txn("0x2", "invoke", 500, "0xc"),
            txn("0x3", "deploy_account", 1, "0xacc"),
            txn("0x4", "deploy", 2, "0xacc"),
        ];

        let result = filter_transactions(&txns, &[deploy("0x3")], 1_000_000, None);

        // deploy exemption goes by hash, not by type
        assert_eq!(hashes(&result), vec!["0x1", "0x3"]);
    }

    #[test]
    fn contract_filter_compares_numerically() {
        let txns = vec![
            txn("0x1", "invoke", 2000, "0x0c"),
            txn("0x2", "invoke", 2000, "12"),
            txn("0x3", "invoke", 2000, "0xd"),
            txn("0x4", "invoke", 2000, ""),
            txn("0x0005", "deploy_account", 1, ""),
        ];

        let result = filter_transactions(&txns, &[deploy("0x5")], 1_000_000, Some("0xc"));

        assert_eq!(hashes(&result), vec!["0x1", "0x2", "0x0005"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let txns = vec![
            txn("0x1", "invoke", 2000, "0xc"),
            txn("0x2", "invoke", 999, "0xc"),
            txn("0x3", "invoke", 2000, "0xd"),
            txn("0x4", "deploy", 3, "0xe"),
        ];
        let deploys = [deploy("0x4")];

        let once = filter_transactions(&txns, &deploys, 1_000_000, Some("0xc"));
        let twice = filter_transactions(&once, &deploys, 1_000_000, Some("0xc"));

        assert_eq!(once, twice);
        assert_eq!(hashes(&once), vec!["0x1", "0x4"]);
    }

    #[test]
    fn deploys_below_window_survive_others_do_not() {
        let deploys: Vec<_> = (0..20).map(|i| deploy(&format!("0xd{:x}", i))).collect();
        let mut txns: Vec<_> = (0..20)
            .map(|i| txn(&format!("0xd{:x}", i), "deploy", i, ""))
            .collect();
        txns.extend((0..20).map(|i| txn(&format!("0xe{:x}", i), "invoke", i, "")));

        let result = filter_transactions(&txns, &deploys, 100_000, None);

        assert_eq!(result.len(), 20);
        assert!(result.iter().all(|t| t.txn_type == "deploy"));
    }
}
