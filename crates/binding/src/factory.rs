//! ERC20 factory contract bindings.

use alloy_sol_types::sol;

sol! {
    /// Factory that deploys BRC-20 backed ERC20 tokens on BEVM.
    #[sol(rpc)]
    interface IBitcoinAssetsErc20Factory {
        /// Deploy a new ERC20 token and return its address.
        ///
        /// `protocol` names the Bitcoin asset protocol the token mirrors (e.g. "brc-20").
        function create(
            string name,
            string symbol,
            uint8 decimals,
            address owner,
            string protocol,
            address admin
        ) external returns (address);
    }
}
