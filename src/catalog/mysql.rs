//! MySQL dialect of the built-in catalog.

pub(super) const QUERIES: &[(&str, &str)] = &[
    (
        "Query 1: Latest 10 transactions with account and block details",
        r#"
SELECT t.tx_hash, a_from.address AS from_address, a_to.address AS to_address,
       t.value, b.block_number, b.timestamp
FROM Transactions t
JOIN Accounts a_from ON t.from_account_id = a_from.id
JOIN Accounts a_to ON t.to_account_id = a_to.id
JOIN Blocks b ON t.block_id = b.id
ORDER BY b.timestamp DESC
LIMIT 10;
"#,
    ),
    (
        "Query 2: Top 5 accounts with the highest balance and their transaction count",
        r#"
SELECT a.address, a.balance, COUNT(t.id) AS transaction_count
FROM Accounts a
LEFT JOIN Transactions t ON a.id = t.from_account_id OR a.id = t.to_account_id
GROUP BY a.id, a.address, a.balance
ORDER BY a.balance DESC
LIMIT 5;
"#,
    ),
    (
        "Query 3: Latest 10 created contracts with their creator's address and creation block number",
        r#"
SELECT c.address AS contract_address, a.address AS creator_address,
       b.block_number AS creation_block_number
FROM Contracts c
JOIN Accounts a ON c.creator_account_id = a.id
JOIN Blocks b ON c.creation_block_id = b.id
ORDER BY b.block_number DESC
LIMIT 10;
"#,
    ),
    (
        "Query 4: Total transaction value and gas used for each block in the last 100 blocks",
        r#"
SELECT b.block_number, b.timestamp,
       SUM(t.value) AS total_value, SUM(t.gas_used) AS total_gas_used
FROM Blocks b
LEFT JOIN Transactions t ON b.id = t.block_id
GROUP BY b.id, b.block_number, b.timestamp
ORDER BY b.block_number DESC
LIMIT 100;
"#,
    ),
    (
        "Query 5: Top 10 contracts by transaction count",
        r#"
SELECT c.address AS contract_address, COUNT(t.id) AS transaction_count
FROM Contracts c
JOIN Transactions t ON c.id = t.contract_id
GROUP BY c.id, c.address
ORDER BY transaction_count DESC
LIMIT 10;
"#,
    ),
    (
        "Query 6: Average transaction value and gas used for each hour in the last 24 hours",
        r#"
SELECT DATE_FORMAT(b.timestamp, '%Y-%m-%d %H:00:00') AS hour,
       AVG(t.value) AS avg_value,
       AVG(t.gas_used) AS avg_gas_used
FROM Transactions t
JOIN Blocks b ON t.block_id = b.id
WHERE b.timestamp >= NOW() - INTERVAL 24 HOUR
GROUP BY hour
ORDER BY hour DESC;
"#,
    ),
    (
        "Query 7: Accounts involved in the highest value transaction for each of the last 10 blocks",
        r#"
WITH RankedTransactions AS (
  SELECT t.*, b.block_number,
         ROW_NUMBER() OVER (PARTITION BY b.id ORDER BY t.value DESC) AS `rank`
  FROM Transactions t
  JOIN Blocks b ON t.block_id = b.id
  WHERE b.block_number >= (SELECT MAX(block_number) - 10 FROM Blocks)
)
SELECT r.block_number, a_from.address AS from_address, a_to.address AS to_address, r.value
FROM RankedTransactions r
JOIN Accounts a_from ON r.from_account_id = a_from.id
JOIN Accounts a_to ON r.to_account_id = a_to.id
WHERE r.`rank` = 1
ORDER BY r.block_number DESC;
"#,
    ),
];
