//! Contract bindings - ERC-20 and LayerBank core interfaces.

use alloy::sol;

sol! {
    /// Standard ERC20 interface, reduced to the calls the bot makes
    #[sol(rpc)]
    interface IERC20 {
        /// Returns the decimals of the token
        function decimals() external view returns (uint8);

        /// Returns the balance of an account
        function balanceOf(address account) external view returns (uint256);

        /// Returns the allowance of a spender
        function allowance(address owner, address spender) external view returns (uint256);

        /// Approves a spender to spend tokens
        function approve(address spender, uint256 amount) external returns (bool);

        /// Emitted when allowance is set
        event Approval(address indexed owner, address indexed spender, uint256 value);
    }

    /// LayerBank core entry point
    #[sol(rpc)]
    interface ILayerBankCore {
        /// Supplies underlying to the given market, minting lTokens
        function supply(address gToken, uint256 uAmount) external payable returns (uint256);
    }
}
