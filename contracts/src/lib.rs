/*!
# Upgradeable Proxy

A forwarding contract that keeps its own state while running the code of a
separately deployed implementation. Calls that do not match one of the proxy's
administrative selectors are delegated: the implementation's code executes
against the proxy's storage, balance and caller.

The proxy's own data lives in two [ERC-1967]-style slots derived by hashing a
fixed name, far away from the sequential slots `0, 1, 2, …` an implementation
lays its fields out in.

## Usage

Deploy an implementation, then a proxy pointing at it. Every call to the
proxy that is not `upgrade`, `changeAdmin`, `getImplementation` or `getAdmin`
runs the implementation's code:

```ignore
use ledger::Ledger;
use upgradeable_proxy::proxy::erc1967::Erc1967Proxy;

let mut ledger = Ledger::default();
let implementation = ledger.deploy(deployer, MyImplementation);
let proxy = Erc1967Proxy::deploy(&mut ledger, deployer, implementation, admin, &[])?;
```

[ERC-1967]: https://eips.ethereum.org/EIPS/eip-1967
*/

#![allow(clippy::module_name_repetitions)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod proxy;
pub mod utils;
