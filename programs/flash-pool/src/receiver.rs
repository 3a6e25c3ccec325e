// =============================================================================
// Flash Loan Receiver Interface
// =============================================================================
// A borrower is any program exposing three Anchor-style instructions:
//
//   supports_interface(interface_id: [u8; 4])     -> bool via return data
//   execute_operation(token, amount, fee, data)
//   execute_operation_batch(tokens, amounts, fees, data)
//
// Before lending, the pool asks the receiver whether it supports both the
// base introspection interface and the receiver interface. Each question is
// a CPI metered against RECEIVER_PROBE_COMPUTE_BUDGET so a receiver cannot
// burn the borrower's compute budget on introspection.
//
// Callback account layout, per lent token:
//   0. `[]`         pool
//   1. `[writable]` vault
//   2. `[writable]` receiver token account
// followed by every extra account the caller supplied, flags preserved.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_lang::solana_program::{
    instruction::{AccountMeta, Instruction},
    program::{get_return_data, invoke},
};

use solana_program::compute_units::sol_remaining_compute_units;

use crate::constants::RECEIVER_PROBE_COMPUTE_BUDGET;
use crate::error::FlashPoolError;

/// Interface id of supports_interface itself (first 4 bytes of its sighash)
pub const BASE_INTERFACE_ID: [u8; 4] = [0xf7, 0x38, 0xbc, 0x46];

/// XOR of the first 4 bytes of the execute_operation and
/// execute_operation_batch sighashes
pub const FLASH_LOAN_RECEIVER_INTERFACE_ID: [u8; 4] = [0x43, 0x2b, 0x8e, 0x77];

/// sha256("global:supports_interface")[..8]
pub const SUPPORTS_INTERFACE_DISCRIMINATOR: [u8; 8] = [0xf7, 0x38, 0xbc, 0x46, 0xcc, 0x4d, 0xae, 0x78];

/// sha256("global:execute_operation")[..8]
pub const EXECUTE_OPERATION_DISCRIMINATOR: [u8; 8] = [0x69, 0xf0, 0xfa, 0x9f, 0x41, 0x84, 0x6f, 0xb9];

/// sha256("global:execute_operation_batch")[..8]
pub const EXECUTE_OPERATION_BATCH_DISCRIMINATOR: [u8; 8] =
    [0x2a, 0xdb, 0x74, 0xe8, 0x81, 0x7c, 0xca, 0xfd];

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct ExecuteOperationArgs {
    pub token: Pubkey,
    pub amount: u64,
    pub fee: u64,
    pub data: Vec<u8>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct ExecuteOperationBatchArgs {
    pub tokens: Vec<Pubkey>,
    pub amounts: Vec<u64>,
    pub fees: Vec<u64>,
    pub data: Vec<u8>,
}

/// Answer of one interface probe
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiverProbe {
    Supported,
    Unsupported,
    BudgetExceeded,
}

/// Accounts of one lent token as seen by the receiver
pub struct LoanLeg<'a, 'info> {
    pub pool: &'a AccountInfo<'info>,
    pub vault: &'a AccountInfo<'info>,
    pub receiver_token_account: &'a AccountInfo<'info>,
}

/// Judge a probe from the compute it used and the return data it left.
/// Only a `true` returned by the receiver program itself counts.
pub fn classify_probe(
    used_units: u64,
    return_data: Option<(Pubkey, Vec<u8>)>,
    receiver: &Pubkey,
) -> ReceiverProbe {
    if used_units > RECEIVER_PROBE_COMPUTE_BUDGET {
        return ReceiverProbe::BudgetExceeded;
    }
    match return_data {
        Some((program_id, data)) if program_id == *receiver && data.first() == Some(&1) => {
            ReceiverProbe::Supported
        }
        _ => ReceiverProbe::Unsupported,
    }
}

fn probe_interface(receiver_program: &AccountInfo, interface_id: [u8; 4]) -> ReceiverProbe {
    let mut data = SUPPORTS_INTERFACE_DISCRIMINATOR.to_vec();
    data.extend_from_slice(&interface_id);

    let instruction = Instruction {
        program_id: *receiver_program.key,
        accounts: vec![],
        data,
    };

    let units_before = sol_remaining_compute_units();
    if invoke(&instruction, &[receiver_program.clone()]).is_err() {
        return ReceiverProbe::Unsupported;
    }
    let used_units = units_before.saturating_sub(sol_remaining_compute_units());

    classify_probe(used_units, get_return_data(), receiver_program.key)
}

/// Require the receiver to answer yes for both interfaces within budget
pub fn require_receiver_interface(receiver_program: &AccountInfo) -> Result<()> {
    require!(receiver_program.executable, FlashPoolError::InvalidReceiverInterface);

    for interface_id in [FLASH_LOAN_RECEIVER_INTERFACE_ID, BASE_INTERFACE_ID] {
        let probe = probe_interface(receiver_program, interface_id);
        if probe != ReceiverProbe::Supported {
            msg!("Receiver probe {:?} for interface {:?}", probe, interface_id);
            return err!(FlashPoolError::InvalidReceiverInterface);
        }
    }
    Ok(())
}

/// Account metas and infos handed to the receiver callback
pub fn callback_accounts<'info>(
    legs: &[LoanLeg<'_, 'info>],
    extra: &[AccountInfo<'info>],
) -> (Vec<AccountMeta>, Vec<AccountInfo<'info>>) {
    let capacity = legs.len() * 3 + extra.len();
    let mut metas = Vec::with_capacity(capacity);
    let mut infos = Vec::with_capacity(capacity + 1);

    for leg in legs {
        metas.push(AccountMeta::new_readonly(*leg.pool.key, false));
        metas.push(AccountMeta::new(*leg.vault.key, false));
        metas.push(AccountMeta::new(*leg.receiver_token_account.key, false));
        infos.push(leg.pool.clone());
        infos.push(leg.vault.clone());
        infos.push(leg.receiver_token_account.clone());
    }

    for acc in extra {
        if acc.is_writable {
            metas.push(AccountMeta::new(*acc.key, acc.is_signer));
        } else {
            metas.push(AccountMeta::new_readonly(*acc.key, acc.is_signer));
        }
        infos.push(acc.clone());
    }

    (metas, infos)
}

fn instruction_data<T: AnchorSerialize>(discriminator: &[u8; 8], args: &T) -> Result<Vec<u8>> {
    let mut data = discriminator.to_vec();
    args.serialize(&mut data)
        .map_err(|_| error!(FlashPoolError::InvalidReceiverInterface))?;
    Ok(data)
}

fn invoke_callback<'info>(
    receiver_program: &AccountInfo<'info>,
    legs: &[LoanLeg<'_, 'info>],
    extra: &[AccountInfo<'info>],
    data: Vec<u8>,
) -> Result<()> {
    let (accounts, mut infos) = callback_accounts(legs, extra);
    infos.push(receiver_program.clone());

    let instruction = Instruction {
        program_id: *receiver_program.key,
        accounts,
        data,
    };

    invoke(&instruction, &infos)?;
    Ok(())
}

/// CPI into the receiver's execute_operation
pub fn execute_operation<'info>(
    receiver_program: &AccountInfo<'info>,
    leg: LoanLeg<'_, 'info>,
    extra: &[AccountInfo<'info>],
    args: &ExecuteOperationArgs,
) -> Result<()> {
    let data = instruction_data(&EXECUTE_OPERATION_DISCRIMINATOR, args)?;
    invoke_callback(receiver_program, &[leg], extra, data)
}

/// CPI into the receiver's execute_operation_batch
pub fn execute_operation_batch<'info>(
    receiver_program: &AccountInfo<'info>,
    legs: &[LoanLeg<'_, 'info>],
    extra: &[AccountInfo<'info>],
    args: &ExecuteOperationBatchArgs,
) -> Result<()> {
    let data = instruction_data(&EXECUTE_OPERATION_BATCH_DISCRIMINATOR, args)?;
    invoke_callback(receiver_program, legs, extra, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_program::hash::hash;

    fn sighash(name: &str) -> [u8; 8] {
        let mut out = [0u8; 8];
        out.copy_from_slice(&hash(format!("global:{name}").as_bytes()).to_bytes()[..8]);
        out
    }

    #[test]
    fn test_discriminators_match_anchor_sighash() {
        assert_eq!(SUPPORTS_INTERFACE_DISCRIMINATOR, sighash("supports_interface"));
        assert_eq!(EXECUTE_OPERATION_DISCRIMINATOR, sighash("execute_operation"));
        assert_eq!(EXECUTE_OPERATION_BATCH_DISCRIMINATOR, sighash("execute_operation_batch"));
    }

    #[test]
    fn test_interface_ids() {
        assert_eq!(&BASE_INTERFACE_ID[..], &SUPPORTS_INTERFACE_DISCRIMINATOR[..4]);
        let single = EXECUTE_OPERATION_DISCRIMINATOR;
        let batch = EXECUTE_OPERATION_BATCH_DISCRIMINATOR;
        let xor: Vec<u8> = (0..4).map(|i| single[i] ^ batch[i]).collect();
        assert_eq!(FLASH_LOAN_RECEIVER_INTERFACE_ID.to_vec(), xor);
    }

    #[test]
    fn test_classify_probe() {
        let receiver = Pubkey::new_from_array([1; 32]);
        let other = Pubkey::new_from_array([2; 32]);

        assert_eq!(
            classify_probe(500, Some((receiver, vec![1])), &receiver),
            ReceiverProbe::Supported
        );
        assert_eq!(
            classify_probe(500, Some((receiver, vec![0])), &receiver),
            ReceiverProbe::Unsupported
        );
        // stale data from some other program
        assert_eq!(
            classify_probe(500, Some((other, vec![1])), &receiver),
            ReceiverProbe::Unsupported
        );
        assert_eq!(classify_probe(500, None, &receiver), ReceiverProbe::Unsupported);
        assert_eq!(
            classify_probe(RECEIVER_PROBE_COMPUTE_BUDGET + 1, Some((receiver, vec![1])), &receiver),
            ReceiverProbe::BudgetExceeded
        );
    }

    #[test]
    fn test_execute_operation_data_layout() {
        let args = ExecuteOperationArgs {
            token: Pubkey::new_from_array([4; 32]),
            amount: 1_000,
            fee: 3,
            data: vec![9, 9],
        };
        let data = instruction_data(&EXECUTE_OPERATION_DISCRIMINATOR, &args).unwrap();
        assert_eq!(&data[..8], &EXECUTE_OPERATION_DISCRIMINATOR);
        assert_eq!(&data[8..40], &[4u8; 32]);
        assert_eq!(&data[40..48], &1_000u64.to_le_bytes());
        assert_eq!(&data[48..56], &3u64.to_le_bytes());
        assert_eq!(&data[56..60], &2u32.to_le_bytes());
        assert_eq!(&data[60..], &[9, 9]);
    }

    #[test]
    fn test_callback_account_layout() {
        let keys: Vec<Pubkey> = (1..=4).map(|n| Pubkey::new_from_array([n; 32])).collect();
        let owner = Pubkey::default();
        let mut lamports = [0u64; 4];
        let mut data: [Vec<u8>; 4] = Default::default();

        let mut infos = Vec::new();
        for ((key, lamports), data) in keys.iter().zip(lamports.iter_mut()).zip(data.iter_mut()) {
            infos.push(AccountInfo::new(key, false, true, lamports, data, &owner, false, 0));
        }
        let leg = LoanLeg {
            pool: &infos[0],
            vault: &infos[1],
            receiver_token_account: &infos[2],
        };

        let (metas, passed) = callback_accounts(&[leg], &infos[3..]);
        assert_eq!(metas.len(), 4);
        assert_eq!(passed.len(), 4);
        assert!(!metas[0].is_writable);
        assert!(metas[1].is_writable && metas[2].is_writable);
        assert_eq!(metas[3].pubkey, keys[3]);
        assert!(metas[3].is_writable);
    }
}
