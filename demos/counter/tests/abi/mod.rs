#![allow(dead_code)]
use alloy_sol_macro::sol;

sol!(
    /// Every call a counter proxy answers: the admin surface of the proxy
    /// and the counter surface forwarded to its implementation.
    contract CounterProxy {
        function upgrade(address newImplementation) external;
        function changeAdmin(address newAdmin) external;
        function getImplementation() external view returns (address);
        function getAdmin() external view returns (address);

        function initialize(address owner) external;
        function increment() external;
        function decrement() external;
        function incrementBy(uint256 amount) external;
        function reset() external;
        function getValue() external view returns (uint256);
        function owner() external view returns (address);
        function totalOperations() external view returns (uint256);
        function version() external view returns (uint256);

        error ERC1967UnauthorizedAccount(address account);
        error ERC1967InvalidImplementation(address implementation);
        error ERC1967InvalidAdmin(address admin);
        error CounterUnauthorizedAccount(address account);
        error CounterAlreadyInitialized();
        error CounterUnderflow();

        #[derive(Debug, PartialEq)]
        event Upgraded(address indexed implementation);
        #[derive(Debug, PartialEq)]
        event AdminChanged(address previousAdmin, address newAdmin);
        #[derive(Debug, PartialEq)]
        event CounterIncremented(uint256 newValue);
        #[derive(Debug, PartialEq)]
        event CounterDecremented(uint256 newValue);
        #[derive(Debug, PartialEq)]
        event BatchOperation(string kind, uint256 amount);
    }
);
